use crate::events::DriverEvent;
use async_channel::Sender;
use std::thread;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::time::MissedTickBehavior;

pub fn start_background_services(tx: Sender<DriverEvent>, frame_rate: f64) {
    thread::spawn(move || {
        let rt = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Failed to create Tokio runtime: {}", e);
                tx.close();
                return;
            }
        };

        rt.block_on(async {
            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::sys::input::read_commands(tx).await;
                });
            }

            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    run_frame_clock(tx, frame_rate).await;
                });
            }

            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    spindle::config::run_async_watcher(tx).await;
                });
            }

            std::future::pending::<()>().await;
        });
    });
}

/// Emits a [`DriverEvent::Frame`] at `frame_rate` Hz until the receiver goes away.
async fn run_frame_clock(tx: Sender<DriverEvent>, frame_rate: f64) {
    let mut interval = tokio::time::interval(Duration::from_secs_f64(1.0 / frame_rate));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        if tx.send(DriverEvent::Frame).await.is_err() {
            break;
        }
    }
}
