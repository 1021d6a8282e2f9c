//! Drives one dialog from the terminal

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use qr_subscribe_core::dialog::{DialogEvent, DialogHandle, DialogOutcome, DialogState, DialogView};
use qr_subscribe_core::qr::parse_qr_payload;
use qr_subscribe_core::traits::SubscribeListener;
use qr_subscribe_core::validation::login_input_valid;

use crate::image_input::load_frame;

/// Login prompts before giving up
const MAX_LOGIN_ATTEMPTS: usize = 3;

/// Where the topic comes from
#[derive(Debug, Clone)]
pub enum Input {
    /// A decoded QR payload
    Payload(String),
    /// An image to scan
    Image { path: PathBuf, timeout: Duration },
    /// Typed by hand, optionally on another server
    Manual {
        topic: String,
        server: Option<String>,
    },
}

/// Credentials supplied up front; missing ones are prompted for.
#[derive(Debug, Clone, Default)]
pub struct LoginArgs {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Prints dialog callbacks to stdout.
pub struct PrintListener;

impl SubscribeListener for PrintListener {
    fn on_subscribe(&self, topic: &str, base_url: &str, instant: bool) {
        println!("Subscribed to {topic} on {base_url} (instant delivery: {instant})");
    }

    fn on_scan_accepted(&self) {
        println!("QR code accepted");
    }
}

/// Feed `input` into the dialog and answer its prompts until it closes.
pub async fn drive(
    handle: &DialogHandle,
    input: Input,
    instant: bool,
    login: LoginArgs,
) -> Result<DialogOutcome> {
    if instant && handle.state().instant_delivery.toggle_visible {
        handle.send(DialogEvent::InstantDeliveryToggled(true))?;
    }

    let state = match input {
        Input::Payload(payload) => {
            parse_qr_payload(&payload)?;
            handle.send(DialogEvent::QrScanned(payload))?;
            handle.wait_for(scan_settled).await?
        }
        Input::Image { path, timeout } => {
            let frame = load_frame(&path)?;
            handle.send(DialogEvent::CameraPermission { granted: true })?;
            handle.send(DialogEvent::Frame(frame))?;
            tokio::time::timeout(timeout, handle.wait_for(scan_settled))
                .await
                .map_err(|_| anyhow!("No usable QR code found in {}", path.display()))??
        }
        Input::Manual { topic, server } => {
            if let Some(server) = server {
                handle.send(DialogEvent::UseAnotherServerToggled(true))?;
                handle.send(DialogEvent::BaseUrlChanged(server))?;
            }
            handle.send(DialogEvent::TopicChanged(topic.clone()))?;
            let state = handle
                .wait_for(|s| s.subscribe_form.topic == topic && !s.validation_pending)
                .await?;
            if state.positive_enabled {
                handle.send(DialogEvent::PositiveClicked)?;
            }
            state
        }
    };

    if !state.is_closed() && !state.subscribe.progress && !state.positive_enabled {
        handle.cancel();
        bail!(
            "Cannot subscribe to {:?} on {}: invalid topic or server, or already subscribed",
            state.subscribe_form.topic,
            state.base_url()
        );
    }

    let state = handle.wait_for(check_settled).await?;
    if let Some(outcome) = state.outcome {
        return Ok(outcome);
    }
    if let Some(error) = state.subscribe.error {
        handle.cancel();
        bail!("{error}");
    }

    login_loop(handle, login).await
}

/// Scan handled: either rejected by validation or already submitted.
fn scan_settled(state: &DialogState) -> bool {
    state.is_closed()
        || state.subscribe.progress
        || (state.subscribe_form.use_another_server && !state.validation_pending)
}

/// Subscribe check finished one way or another.
fn check_settled(state: &DialogState) -> bool {
    state.is_closed()
        || state.view == DialogView::Login
        || (!state.subscribe.progress && state.subscribe.error.is_some())
}

async fn login_loop(handle: &DialogHandle, mut login: LoginArgs) -> Result<DialogOutcome> {
    if login.username.as_deref() == Some("") || login.password.as_deref() == Some("") {
        handle.cancel();
        bail!("Username and password must not be empty");
    }

    for _ in 0..MAX_LOGIN_ATTEMPTS {
        let username = match login.username.take() {
            Some(username) => username,
            None => prompt("Username: ").await?,
        };
        let password = match login.password.take() {
            Some(password) => password,
            None => prompt("Password: ").await?,
        };
        if !login_input_valid(&username, &password) {
            eprintln!("Username and password must not be empty");
            continue;
        }

        handle.send(DialogEvent::UsernameChanged(username.clone()))?;
        handle.send(DialogEvent::PasswordChanged(password.clone()))?;
        let state = handle
            .wait_for(|s| {
                s.is_closed()
                    || (s.login_form.username == username && s.login_form.password == password)
            })
            .await?;
        if let Some(outcome) = state.outcome {
            return Ok(outcome);
        }
        if !state.positive_enabled {
            handle.cancel();
            bail!("Login is not available");
        }

        let attempt = state.login_attempts + 1;
        tracing::debug!("Login attempt {attempt}");
        handle.send(DialogEvent::PositiveClicked)?;

        let state = handle
            .wait_for(|s| {
                s.is_closed()
                    || (s.login_attempts == attempt && !s.login.progress && s.login.error.is_some())
            })
            .await?;
        if let Some(outcome) = state.outcome {
            return Ok(outcome);
        }
        if let Some(error) = state.login.error {
            eprintln!("{error}");
        }
    }

    handle.cancel();
    bail!("Giving up after {MAX_LOGIN_ATTEMPTS} login attempts")
}

async fn prompt(label: &'static str) -> Result<String> {
    tokio::task::spawn_blocking(move || -> Result<String> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(label.as_bytes())?;
        stdout.flush()?;

        let mut line = String::new();
        let read = std::io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            bail!("No input for {}", label.trim_end_matches(": "));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    })
    .await
    .context("Prompt task failed")?
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use qr_subscribe_core::error::CoreResult;
    use qr_subscribe_core::traits::{AuthClient, InMemorySubscriptionStore, SubscriptionStore};
    use qr_subscribe_core::types::{Credential, StoreSnapshot, Subscription};
    use qr_subscribe_core::{ServiceContext, SubscribeDialog};

    use super::*;

    struct ScriptedAuthClient {
        answers: Mutex<Vec<bool>>,
    }

    #[async_trait]
    impl AuthClient for ScriptedAuthClient {
        async fn check_auth(
            &self,
            _base_url: &str,
            _topic: &str,
            _user: Option<&Credential>,
        ) -> CoreResult<bool> {
            let mut answers = self.answers.lock().unwrap();
            Ok(if answers.is_empty() {
                true
            } else {
                answers.remove(0)
            })
        }
    }

    async fn open(answers: &[bool], store: Arc<InMemorySubscriptionStore>) -> DialogHandle {
        let client = Arc::new(ScriptedAuthClient {
            answers: Mutex::new(answers.to_vec()),
        });
        let ctx = Arc::new(ServiceContext::new(client, store));
        SubscribeDialog::builder(ctx, Arc::new(PrintListener))
            .open()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn payload_subscribes() {
        let handle = open(&[true], Arc::new(InMemorySubscriptionStore::new())).await;
        let outcome = drive(
            &handle,
            Input::Payload("https://ntfy.sh/alerts".into()),
            false,
            LoginArgs::default(),
        )
        .await
        .unwrap();

        assert_eq!(
            outcome,
            DialogOutcome::Subscribed {
                topic: "alerts".into(),
                base_url: "https://ntfy.sh".into(),
                instant: false,
            }
        );
    }

    #[tokio::test]
    async fn manual_topic_with_instant_flag() {
        let handle = open(&[true], Arc::new(InMemorySubscriptionStore::new())).await;
        let outcome = drive(
            &handle,
            Input::Manual {
                topic: "alerts".into(),
                server: None,
            },
            true,
            LoginArgs::default(),
        )
        .await
        .unwrap();

        assert!(matches!(
            outcome,
            DialogOutcome::Subscribed { instant: true, .. }
        ));
    }

    #[tokio::test]
    async fn existing_subscription_is_reported() {
        let store = Arc::new(InMemorySubscriptionStore::from_snapshot(StoreSnapshot {
            subscriptions: vec![Subscription {
                base_url: "https://ntfy.sh".into(),
                topic: "alerts".into(),
                instant: false,
            }],
            ..StoreSnapshot::default()
        }));
        let handle = open(&[], store).await;

        let err = drive(
            &handle,
            Input::Payload("https://ntfy.sh/alerts".into()),
            false,
            LoginArgs::default(),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("already subscribed"));
    }

    #[tokio::test]
    async fn unparseable_payload_is_rejected() {
        let handle = open(&[], Arc::new(InMemorySubscriptionStore::new())).await;
        let err = drive(
            &handle,
            Input::Payload("not a topic url".into()),
            false,
            LoginArgs::default(),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().starts_with("Invalid QR code"));
    }

    #[tokio::test]
    async fn login_with_supplied_credentials() {
        let store = Arc::new(InMemorySubscriptionStore::new());
        let handle = open(&[false, true], store.clone()).await;

        let outcome = drive(
            &handle,
            Input::Manual {
                topic: "private".into(),
                server: Some("https://self.hosted".into()),
            },
            false,
            LoginArgs {
                username: Some("phil".into()),
                password: Some("secret".into()),
            },
        )
        .await
        .unwrap();

        assert!(matches!(outcome, DialogOutcome::Subscribed { .. }));
        let user = store.get_user("https://self.hosted").await.unwrap().unwrap();
        assert_eq!(user.username, "phil");
    }

    #[tokio::test]
    async fn empty_supplied_username_is_rejected() {
        let handle = open(&[false], Arc::new(InMemorySubscriptionStore::new())).await;

        let result = tokio::time::timeout(
            Duration::from_secs(3),
            drive(
                &handle,
                Input::Manual {
                    topic: "private".into(),
                    server: None,
                },
                false,
                LoginArgs {
                    username: Some(String::new()),
                    password: Some("pw".into()),
                },
            ),
        )
        .await
        .expect("login loop must not block on empty input");

        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "Username and password must not be empty");
        assert_eq!(handle.closed().await, Some(DialogOutcome::Cancelled));
    }
}
