//! Signal handling for the live recording loop

use tokio::sync::mpsc;

/// Commands a running recording session reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSignal {
    /// Stop and save (SIGINT/SIGTERM)
    Stop,
    /// Pause recording (SIGUSR1)
    Pause,
    /// Resume recording (SIGUSR2)
    Resume,
}

/// Session signal handler.
///
/// Translates OS signals into session commands delivered over a channel so
/// the recording loop consumes them in one place.
pub struct SessionSignalHandler {
    receiver: mpsc::Receiver<SessionSignal>,
}

impl SessionSignalHandler {
    /// Create a new handler and start listening for signals.
    pub async fn new() -> Result<Self, std::io::Error> {
        let (tx, rx) = mpsc::channel(10);

        // SIGINT (Ctrl+C): stop and save
        let tx_int = tx.clone();
        tokio::spawn(async move {
            loop {
                if tokio::signal::ctrl_c().await.is_err() {
                    break;
                }
                if tx_int.send(SessionSignal::Stop).await.is_err() {
                    break;
                }
            }
        });

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            // SIGTERM: stop and save
            let tx_term = tx.clone();
            let mut sigterm = signal(SignalKind::terminate())?;
            tokio::spawn(async move {
                while sigterm.recv().await.is_some() {
                    if tx_term.send(SessionSignal::Stop).await.is_err() {
                        break;
                    }
                }
            });

            // SIGUSR1: pause
            let tx_usr1 = tx.clone();
            let mut sigusr1 = signal(SignalKind::user_defined1())?;
            tokio::spawn(async move {
                while sigusr1.recv().await.is_some() {
                    if tx_usr1.send(SessionSignal::Pause).await.is_err() {
                        break;
                    }
                }
            });

            // SIGUSR2: resume
            let tx_usr2 = tx.clone();
            let mut sigusr2 = signal(SignalKind::user_defined2())?;
            tokio::spawn(async move {
                while sigusr2.recv().await.is_some() {
                    if tx_usr2.send(SessionSignal::Resume).await.is_err() {
                        break;
                    }
                }
            });
        }

        Ok(Self { receiver: rx })
    }

    /// Wait for the next signal
    pub async fn recv(&mut self) -> Option<SessionSignal> {
        self.receiver.recv().await
    }

    /// Check for a pending signal without waiting
    pub fn try_recv(&mut self) -> Option<SessionSignal> {
        self.receiver.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_signal_equality() {
        assert_eq!(SessionSignal::Stop, SessionSignal::Stop);
        assert_ne!(SessionSignal::Pause, SessionSignal::Resume);
    }
}
