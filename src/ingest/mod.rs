//! Sensor ingest
//!
//! TCP listener for the room sensors. Each sensor opens a connection, sends
//! one report (`address,rssi` lines) and the server closes the connection.
//! The sensor's IP address identifies its room.
//!
//! Every accepted report replaces that room's latest report and triggers one
//! analysis step.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};

use crate::config::IngestConfig;
use crate::tracker::{RssiReport, StepResult, TrackerError, TrackerResult, TrackerState};

/// Limits applied to every sensor connection
#[derive(Debug, Clone, Copy)]
pub struct ReportLimits {
    /// Bytes read from the connection
    pub max_bytes: usize,
    /// Time the sensor has to send its report
    pub read_timeout: Duration,
}

impl ReportLimits {
    pub fn from_config(config: &IngestConfig) -> Self {
        Self {
            max_bytes: config.max_report_bytes,
            read_timeout: Duration::from_secs(config.read_timeout_secs),
        }
    }
}

/// Bind the sensor listener; [`run`] then serves it
pub async fn bind(config: &IngestConfig) -> TrackerResult<TcpListener> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Sensor ingest listening on {}", addr);
    Ok(listener)
}

/// Accept loop over an already bound listener
pub async fn run(
    listener: TcpListener,
    state: Arc<TrackerState>,
    limits: ReportLimits,
    shutdown: impl Future<Output = ()>,
) -> TrackerResult<()> {
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer)) => {
                        let state = Arc::clone(&state);
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, peer, &state, limits).await {
                                tracing::warn!(peer = %peer, error = %e, "Dropped sensor report");
                            }
                        });
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to accept sensor connection");
                    }
                }
            }
            _ = &mut shutdown => {
                tracing::info!("Sensor ingest shutting down");
                return Ok(());
            }
        }
    }
}

/// Read one report from a sensor connection and record it
async fn handle_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    state: &TrackerState,
    limits: ReportLimits,
) -> TrackerResult<StepResult> {
    let room = state.room_for_sensor(peer.ip())?;

    let mut buf = vec![0u8; limits.max_bytes];
    let n = tokio::time::timeout(limits.read_timeout, stream.read(&mut buf))
        .await
        .map_err(|_| TrackerError::ReportTimeout(limits.read_timeout))??;
    drop(stream);

    let body = std::str::from_utf8(&buf[..n]).map_err(|e| TrackerError::MalformedReport {
        line: 0,
        reason: format!("report is not UTF-8: {}", e),
    })?;
    let report = RssiReport::parse(body)?;

    tracing::debug!(peer = %peer, room = %room, readings = report.len(), "Sensor report received");

    state.record(room, report).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::{Analyzer, PetId, RoomCode};
    use std::collections::HashMap;
    use std::net::{IpAddr, Ipv4Addr};
    use tokio::io::AsyncWriteExt;
    use tokio::sync::oneshot;

    const WHITE: &str = "c8:a0:f1:69:d0:9c";

    fn limits() -> ReportLimits {
        ReportLimits {
            max_bytes: 1024,
            read_timeout: Duration::from_millis(100),
        }
    }

    async fn wait_for_steps(state: &TrackerState, steps: u64) {
        for _ in 0..100 {
            if state.snapshot().await.total_time >= steps {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("report was not recorded");
    }

    #[tokio::test]
    async fn test_report_over_tcp() {
        let sensors = HashMap::from([(IpAddr::V4(Ipv4Addr::LOCALHOST), RoomCode::LargeBedroom)]);
        let state = Arc::new(TrackerState::new(
            sensors,
            Analyzer::new([(WHITE, PetId::Pet0)]),
        ));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(run(listener, Arc::clone(&state), limits(), async move {
            let _ = stop_rx.await;
        }));

        let mut client = TcpStream::connect(addr).await.unwrap();
        client
            .write_all(format!("{},-48\n", WHITE).as_bytes())
            .await
            .unwrap();
        client.shutdown().await.unwrap();

        wait_for_steps(&state, 1).await;
        let snapshot = state.snapshot().await;
        assert_eq!(snapshot.pet(PetId::Pet0).room_located, RoomCode::LargeBedroom);

        stop_tx.send(()).unwrap();
        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_unknown_sensor_is_ignored() {
        let state = Arc::new(TrackerState::new(
            HashMap::new(),
            Analyzer::new([(WHITE, PetId::Pet0)]),
        ));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(run(listener, Arc::clone(&state), limits(), async move {
            let _ = stop_rx.await;
        }));

        let mut client = TcpStream::connect(addr).await.unwrap();
        let _ = client.write_all(format!("{},-48\n", WHITE).as_bytes()).await;
        let _ = client.shutdown().await;
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        assert_eq!(state.snapshot().await.total_time, 0);

        stop_tx.send(()).unwrap();
        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_silent_sensor_is_disconnected() {
        let sensors = HashMap::from([(IpAddr::V4(Ipv4Addr::LOCALHOST), RoomCode::Bathroom)]);
        let state = Arc::new(TrackerState::new(
            sensors,
            Analyzer::new([(WHITE, PetId::Pet0)]),
        ));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(run(listener, Arc::clone(&state), limits(), async move {
            let _ = stop_rx.await;
        }));

        // Connect and send nothing; the server closes after the deadline
        let mut client = TcpStream::connect(addr).await.unwrap();
        let mut buf = [0u8; 16];
        let read = tokio::time::timeout(Duration::from_secs(5), client.read(&mut buf))
            .await
            .expect("server kept the silent connection open");
        assert_eq!(read.unwrap(), 0);
        assert_eq!(state.snapshot().await.total_time, 0);

        stop_tx.send(()).unwrap();
        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_bind_fails_on_busy_port() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = IngestConfig {
            host: "127.0.0.1".to_string(),
            port: taken.local_addr().unwrap().port(),
            ..Default::default()
        };

        let err = bind(&config).await.unwrap_err();
        assert!(matches!(err, TrackerError::Io(_)));
    }
}
