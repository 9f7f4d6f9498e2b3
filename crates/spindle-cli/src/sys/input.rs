use crate::events::DriverEvent;
use crate::script;
use async_channel::Sender;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Reads script commands from stdin, one per line.
pub async fn read_commands(tx: Sender<DriverEvent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut line_no = 0;

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                line_no += 1;
                match script::parse_line(line_no, &line) {
                    Ok(Some(command)) => {
                        if tx.send(DriverEvent::Command(command)).await.is_err() {
                            return;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => log::error!("{}", e),
                }
            }
            Ok(None) => break,
            Err(e) => {
                log::error!("Failed to read stdin: {}", e);
                break;
            }
        }
    }

    let _ = tx.send(DriverEvent::Closed).await;
}
