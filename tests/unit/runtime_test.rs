//! Tests for runtime adapters

use std::time::Duration;

use dispatch_timing::core::TimedScheduler;
use dispatch_timing::runtime::TokioRecorder;

#[tokio::test]
async fn test_timed_scheduler_reports_to_async_consumer() {
    let (recorder, mut rx) = TokioRecorder::channel();
    let consumer = tokio::spawn(async move {
        let mut seen = Vec::new();
        while let Some(elapsed) = rx.recv().await {
            seen.push(elapsed);
        }
        seen
    });

    {
        let timed = TimedScheduler::new(recorder);
        timed.call_soon(|| {
            std::thread::sleep(Duration::from_millis(5));
            Ok(())
        });
        timed.call_soon(|| Ok(()));
        assert_eq!(timed.run_until_idle(), 2);
    }

    let seen = consumer.await.unwrap();
    assert_eq!(seen.len(), 2);
    assert!(seen[0] >= Duration::from_millis(5));
}
