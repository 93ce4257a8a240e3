use async_trait::async_trait;

use crate::ports::{Pacer, Pause};

/// tokio のタイマーで sleep する
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn wait(&self, pause: Pause) {
        tokio::time::sleep(pause.duration()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn sleeps_for_the_requested_pause() {
        let start = Instant::now();
        TokioPacer.wait(Pause::Interval(Duration::from_millis(50))).await;
        assert!(start.elapsed() >= Duration::from_millis(50));

        let start = Instant::now();
        TokioPacer.wait(Pause::CoolDown(Duration::from_secs(3))).await;
        assert!(start.elapsed() >= Duration::from_secs(3));
    }
}
