// Example worker bodies. Each does one unit of work per iteration, then
// polls its cancellation token for at most one poll interval and exits as
// soon as the signal is observed. The bodies only ever see the read-only
// token: they cannot trigger shutdown themselves.

use quiesce_core::constants::{FAST_POLL_INTERVAL, SLOW_POLL_INTERVAL};
use quiesce_core::{CancellationToken, Result};
use tracing::{info, trace};

/// Counts upward from zero, one tick per millisecond.
pub async fn counting_up(mut token: CancellationToken) -> Result<()> {
    let mut count: u64 = 0;
    loop {
        trace!(count, "tick");
        count += 1;

        if token.wait_for(FAST_POLL_INTERVAL).await.is_signaled() {
            break;
        }
    }
    Ok(())
}

/// Counts down in hex from 0x10000.
pub async fn counting_down(mut token: CancellationToken) -> Result<()> {
    let mut count: u32 = 0x10000;
    loop {
        trace!("tick {count:#x}");
        count = count.wrapping_sub(1);

        if token.wait_for(FAST_POLL_INTERVAL).await.is_signaled() {
            break;
        }
    }
    Ok(())
}

/// Cycles through fruit names every half second.
pub async fn fruit_cycle(mut token: CancellationToken) -> Result<()> {
    const FRUITS: [&str; 4] = ["apple", "orange", "banana", "lemon"];

    let mut count: usize = 0;
    loop {
        info!(fruit = FRUITS[count % FRUITS.len()], "tick");
        count += 1;

        if token.wait_for(SLOW_POLL_INTERVAL).await.is_signaled() {
            break;
        }
    }
    Ok(())
}

/// Prints a story that loses its last chunk each tick, resetting once empty.
pub async fn shrinking_story(mut token: CancellationToken) -> Result<()> {
    const STORY: &str = "<0><1><2><3><4><5><6><7><8>";
    const CHUNK: usize = 3;

    let mut remaining = STORY.len();
    loop {
        if remaining == 0 {
            remaining = STORY.len();
        }
        trace!(story = &STORY[..remaining], "tick");
        remaining = remaining.saturating_sub(CHUNK);

        if token.wait_for(FAST_POLL_INTERVAL).await.is_signaled() {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiesce_core::cancellation_channel;

    #[tokio::test(start_paused = true)]
    async fn bodies_exit_once_signaled() {
        let (source, token) = cancellation_channel();

        let handles = vec![
            tokio::spawn(counting_up(token.clone())),
            tokio::spawn(counting_down(token.clone())),
            tokio::spawn(fruit_cycle(token.clone())),
            tokio::spawn(shrinking_story(token)),
        ];

        tokio::time::sleep(std::time::Duration::from_millis(700)).await;
        source.signal();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }
    }
}
