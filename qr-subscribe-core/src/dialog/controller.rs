//! Dialog event loop
//!
//! [`SubscribeDialog`] owns the [`DialogState`] on one tokio task. Every
//! mutation happens there: user events arrive through the handle, results of
//! spawned validation and authorization tasks arrive through the same
//! channel. A [`CancellationToken`] bound to the dialog lifetime stops
//! in-flight work and turns late results into no-ops.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::error::{CoreError, CoreResult};
use crate::qr::parse_qr_payload;
use crate::scanner::ScanWorker;
use crate::services::{
    AuthorizationService, ServiceContext, SubscribeCheck, SubscribeInput, ValidationService,
};
use crate::traits::{QrScanner, SubscribeListener};

use super::event::{DialogEvent, Message};
use super::seq::{Generation, ValidationSeq};
use super::state::{CameraState, DialogOutcome, DialogState, DialogView, Field};

/// Entry point for opening a dialog
pub struct SubscribeDialog;

impl SubscribeDialog {
    #[must_use]
    pub fn builder(
        ctx: Arc<ServiceContext>,
        listener: Arc<dyn SubscribeListener>,
    ) -> SubscribeDialogBuilder {
        SubscribeDialogBuilder {
            ctx,
            listener,
            scanner: None,
        }
    }
}

pub struct SubscribeDialogBuilder {
    ctx: Arc<ServiceContext>,
    listener: Arc<dyn SubscribeListener>,
    scanner: Option<Box<dyn QrScanner>>,
}

impl SubscribeDialogBuilder {
    /// Decode raw [`DialogEvent::Frame`]s with `scanner` once camera
    /// permission is granted.
    #[must_use]
    pub fn with_scanner(mut self, scanner: Box<dyn QrScanner>) -> Self {
        self.scanner = Some(scanner);
        self
    }

    /// Read delivery settings and start the dialog task.
    ///
    /// Must be called inside a tokio runtime.
    pub async fn open(self) -> CoreResult<DialogHandle> {
        let settings = self.ctx.delivery_settings().await?;
        let state = DialogState::new(settings);

        let (tx, rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(state.clone());
        let cancel = CancellationToken::new();

        let mut dialog = Dialog {
            ctx: self.ctx,
            listener: self.listener,
            scanner: self.scanner,
            worker: None,
            state,
            seq: ValidationSeq::default(),
            scan_submit: None,
            tx: tx.clone(),
            state_tx,
            cancel: cancel.clone(),
        };
        dialog.start_validation();
        dialog.publish();

        tokio::spawn(dialog.run(rx));
        log::debug!("Subscribe dialog opened");

        Ok(DialogHandle {
            events: tx,
            state: state_rx,
            _guard: cancel.clone().drop_guard(),
            cancel,
        })
    }
}

/// Frontend side of an open dialog
///
/// Dropping the handle cancels the dialog.
pub struct DialogHandle {
    events: mpsc::UnboundedSender<Message>,
    state: watch::Receiver<DialogState>,
    cancel: CancellationToken,
    _guard: DropGuard,
}

impl DialogHandle {
    /// Queue an event for the dialog task.
    pub fn send(&self, event: DialogEvent) -> CoreResult<()> {
        self.events
            .send(event.into())
            .map_err(|_| CoreError::DialogClosed)
    }

    /// Current view state snapshot
    #[must_use]
    pub fn state(&self) -> DialogState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every published snapshot
    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<DialogState> {
        self.state.clone()
    }

    /// Wait for the first snapshot matching `pred`.
    pub async fn wait_for(
        &self,
        pred: impl FnMut(&DialogState) -> bool,
    ) -> CoreResult<DialogState> {
        let mut rx = self.state.clone();
        let state = rx
            .wait_for(pred)
            .await
            .map_err(|_| CoreError::DialogClosed)?;
        Ok(state.clone())
    }

    /// Dismiss the dialog. In-flight checks are abandoned without side effects.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Resolves once the dialog is torn down (scanner thread joined).
    pub async fn closed(&self) -> Option<DialogOutcome> {
        let mut rx = self.state.clone();
        let state = rx.wait_for(|s| s.is_closed()).await.ok()?;
        state.outcome.clone()
    }
}

/// State owned by the dialog task
struct Dialog {
    ctx: Arc<ServiceContext>,
    listener: Arc<dyn SubscribeListener>,
    scanner: Option<Box<dyn QrScanner>>,
    worker: Option<ScanWorker>,
    state: DialogState,
    seq: ValidationSeq,
    /// Validation generation started by a QR scan; submits when it passes
    scan_submit: Option<Generation>,
    tx: mpsc::UnboundedSender<Message>,
    state_tx: watch::Sender<DialogState>,
    cancel: CancellationToken,
}

impl Dialog {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Message>) {
        loop {
            let message = tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                message = rx.recv() => match message {
                    Some(message) => message,
                    None => break,
                },
            };

            self.handle(message);
            if self.state.is_closed() {
                break;
            }
            self.publish();
        }

        // 先停止所有进行中的任务，关闭事件通道
        self.cancel.cancel();
        drop(rx);
        if !self.state.is_closed() {
            log::debug!("Subscribe dialog cancelled");
            self.state.close(DialogOutcome::Cancelled);
        }
        self.state.camera = CameraState::Stopped;

        if let Some(worker) = self.worker.take() {
            if let Err(e) = tokio::task::spawn_blocking(move || worker.shutdown()).await {
                log::error!("QR analyzer shutdown failed: {e}");
            }
        }

        self.publish();
        log::debug!("Subscribe dialog closed: {:?}", self.state.outcome);
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.state.clone());
    }

    fn handle(&mut self, message: Message) {
        match message {
            Message::Event(event) => self.handle_event(event),
            Message::Validated { generation, result } => self.on_validated(generation, result),
            Message::SubscribeChecked {
                topic,
                base_url,
                result,
            } => self.on_subscribe_checked(topic, base_url, result),
            Message::LoginChecked {
                topic,
                base_url,
                result,
            } => self.on_login_checked(topic, base_url, result),
        }
    }

    fn handle_event(&mut self, event: DialogEvent) {
        match event {
            DialogEvent::TopicChanged(topic) => {
                if self.editing_subscribe() {
                    self.state.subscribe_form.topic = topic;
                    self.start_validation();
                }
            }
            DialogEvent::BaseUrlChanged(base_url) => {
                if self.editing_subscribe() {
                    self.state.subscribe_form.base_url = base_url;
                    self.start_validation();
                }
            }
            DialogEvent::UseAnotherServerToggled(on) => {
                if self.editing_subscribe() {
                    self.state.subscribe_form.use_another_server = on;
                    self.state.focus = if on { Field::BaseUrl } else { Field::Topic };
                    self.start_validation();
                }
            }
            DialogEvent::InstantDeliveryToggled(checked) => {
                if self.editing_subscribe() && self.state.instant_delivery.toggle_visible {
                    self.state.subscribe_form.instant_delivery = checked;
                    self.state.refresh_instant_view();
                    self.start_validation();
                }
            }
            DialogEvent::UsernameChanged(username) => {
                if self.editing_login() {
                    self.state.login_form.username = username;
                    self.state.apply_login_input();
                }
            }
            DialogEvent::PasswordChanged(password) => {
                if self.editing_login() {
                    self.state.login_form.password = password;
                    self.state.apply_login_input();
                }
            }
            DialogEvent::PositiveClicked => self.on_positive(),
            DialogEvent::NegativeClicked => self.on_negative(),
            DialogEvent::Cancel => self.state.close(DialogOutcome::Cancelled),
            DialogEvent::CameraPermission { granted } => self.on_camera_permission(granted),
            DialogEvent::QrScanned(payload) => self.on_qr_scanned(&payload),
            DialogEvent::Frame(frame) => {
                if self.state.camera == CameraState::Scanning {
                    if let Some(worker) = &self.worker {
                        worker.submit(frame);
                    }
                }
            }
        }
    }

    fn editing_subscribe(&self) -> bool {
        self.state.view == DialogView::Subscribe && self.state.accepts_input()
    }

    fn editing_login(&self) -> bool {
        self.state.view == DialogView::Login && self.state.accepts_input()
    }

    // ===== Validation =====

    fn start_validation(&mut self) -> Generation {
        let generation = self.seq.next();
        self.state.validation_pending = true;
        // 结果返回前不允许提交旧输入
        self.state.positive_enabled = false;

        let input = SubscribeInput {
            topic: self.state.subscribe_form.topic.clone(),
            base_url: self.state.base_url(),
            use_another_server: self.state.subscribe_form.use_another_server,
        };
        let service = ValidationService::new(self.ctx.clone());
        self.spawn(async move {
            let result = service.validate_subscribe(&input).await;
            Message::Validated { generation, result }
        });
        generation
    }

    fn on_validated(&mut self, generation: Generation, result: CoreResult<bool>) {
        if !self.seq.is_latest(generation) {
            log::debug!("Dropping stale validation result {generation:?}");
            return;
        }
        self.state.validation_pending = false;
        let scan_submit = self.scan_submit.take() == Some(generation);

        let valid = result.unwrap_or_else(|e| {
            log::warn!("Subscribe validation failed: {e}");
            false
        });
        if !self.state.apply_subscribe_validation(valid) {
            return;
        }

        if scan_submit && valid {
            log::debug!("Scanned topic is valid, subscribing");
            self.listener.on_scan_accepted();
            self.start_subscribe_check();
        }
    }

    // ===== Buttons =====

    fn on_positive(&mut self) {
        if !self.state.positive_enabled || self.state.is_busy() || self.state.is_closed() {
            return;
        }
        match self.state.view {
            DialogView::Subscribe => self.start_subscribe_check(),
            DialogView::Login => self.start_login_check(),
        }
    }

    fn on_negative(&mut self) {
        if !self.state.negative_enabled() {
            return;
        }
        match self.state.view {
            DialogView::Subscribe => self.state.close(DialogOutcome::Cancelled),
            DialogView::Login => {
                self.state.show_subscribe();
                self.start_validation();
            }
        }
    }

    // ===== Authorization =====

    fn start_subscribe_check(&mut self) {
        let topic = self.state.subscribe_form.topic.clone();
        let base_url = self.state.base_url();
        self.state.begin_subscribe_check();

        let service = AuthorizationService::new(self.ctx.clone());
        self.spawn(async move {
            let result = service.attempt_subscribe(&base_url, &topic).await;
            Message::SubscribeChecked {
                topic,
                base_url,
                result,
            }
        });
    }

    fn on_subscribe_checked(
        &mut self,
        topic: String,
        base_url: String,
        result: CoreResult<SubscribeCheck>,
    ) {
        if !self.host_alive()
            || self.state.view != DialogView::Subscribe
            || !self.state.subscribe.progress
        {
            return;
        }
        match result {
            Ok(SubscribeCheck::Authorized) => self.complete(topic, base_url),
            Ok(SubscribeCheck::LoginRequired) => self.state.show_login(),
            Err(e) => self.state.fail_subscribe(e.to_string()),
        }
    }

    fn start_login_check(&mut self) {
        let topic = self.state.subscribe_form.topic.clone();
        let base_url = self.state.base_url();
        let username = self.state.login_form.username.clone();
        let password = self.state.login_form.password.clone();
        self.state.begin_login_check();

        let service = AuthorizationService::new(self.ctx.clone());
        self.spawn(async move {
            let result = service
                .attempt_login(&base_url, &topic, &username, &password)
                .await;
            Message::LoginChecked {
                topic,
                base_url,
                result,
            }
        });
    }

    fn on_login_checked(&mut self, topic: String, base_url: String, result: CoreResult<()>) {
        if !self.host_alive() || self.state.view != DialogView::Login || !self.state.login.progress
        {
            return;
        }
        match result {
            Ok(()) => self.complete(topic, base_url),
            Err(e) => self.state.fail_login(e.to_string()),
        }
    }

    fn complete(&mut self, topic: String, base_url: String) {
        let instant = self.state.is_instant(&base_url);
        log::info!("Subscribing to topic {topic} on {base_url} (instant: {instant})");
        self.listener.on_subscribe(&topic, &base_url, instant);
        self.state.close(DialogOutcome::Subscribed {
            topic,
            base_url,
            instant,
        });
    }

    fn host_alive(&self) -> bool {
        !self.cancel.is_cancelled() && !self.state.is_closed()
    }

    // ===== Camera =====

    fn on_camera_permission(&mut self, granted: bool) {
        if !granted {
            log::info!("Camera permission denied");
            self.state.camera = CameraState::PermissionDenied;
            return;
        }

        if let Some(scanner) = self.scanner.take() {
            let tx = self.tx.clone();
            let spawned = ScanWorker::spawn(scanner, move |payload| {
                tx.send(DialogEvent::QrScanned(payload).into()).is_ok()
            });
            match spawned {
                Ok(worker) => self.worker = Some(worker),
                Err(e) => {
                    log::error!("Failed to start QR analyzer: {e}");
                    return;
                }
            }
        }
        self.state.camera = CameraState::Scanning;
    }

    fn on_qr_scanned(&mut self, payload: &str) {
        if !self.editing_subscribe() {
            return;
        }
        let target = match parse_qr_payload(payload) {
            Ok(target) => target,
            Err(e) => {
                log::warn!("Ignoring QR code: {e}");
                return;
            }
        };
        log::debug!("Scanned topic {} on {}", target.topic, target.base_url);

        let form = &mut self.state.subscribe_form;
        form.use_another_server = true;
        form.base_url = target.base_url;
        form.topic = target.topic;
        self.scan_submit = Some(self.start_validation());
    }

    // ===== Tasks =====

    fn spawn<F>(&self, work: F)
    where
        F: Future<Output = Message> + Send + 'static,
    {
        let cancel = self.cancel.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => {}
                message = work => {
                    // 对话框已关闭时接收端已释放
                    let _ = tx.send(message);
                }
            }
        });
    }
}
