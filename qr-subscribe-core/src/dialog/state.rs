//! 对话框视图状态
//!
//! Plain data plus the synchronous transitions of the two-page dialog. The
//! controller is the only writer; frontends render published snapshots.

use serde::Serialize;

use crate::types::DeliverySettings;
use crate::validation::login_input_valid;

/// Which page is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DialogView {
    Subscribe,
    Login,
}

/// Input field holding focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Field {
    Topic,
    BaseUrl,
    Username,
    Password,
}

/// Camera preview state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CameraState {
    /// Waiting for the frontend to report the permission result
    AwaitingPermission,
    /// Permission refused; the permission notice is shown
    PermissionDenied,
    /// Frames are being analyzed
    Scanning,
    /// Dialog closed, analyzer shut down
    Stopped,
}

/// Progress, error slot and input enablement owned by one page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageStatus {
    pub progress: bool,
    pub error: Option<String>,
    pub inputs_enabled: bool,
}

impl PageStatus {
    fn reset(&mut self) {
        self.progress = false;
        self.error = None;
        self.inputs_enabled = true;
    }
}

/// Subscribe page fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubscribeForm {
    pub topic: String,
    pub base_url: String,
    pub use_another_server: bool,
    pub instant_delivery: bool,
}

/// Login page fields
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Visibility of the instant-delivery widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InstantDeliveryView {
    pub toggle_visible: bool,
    pub description_visible: bool,
    pub foreground_description_visible: bool,
}

impl InstantDeliveryView {
    fn compute(settings: &DeliverySettings, checked: bool) -> Self {
        if settings.instant_toggle_allowed() {
            Self {
                toggle_visible: true,
                description_visible: checked,
                foreground_description_visible: false,
            }
        } else {
            Self {
                toggle_visible: false,
                description_visible: false,
                foreground_description_visible: settings.push_available,
            }
        }
    }
}

/// How the dialog ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DialogOutcome {
    Subscribed {
        topic: String,
        base_url: String,
        instant: bool,
    },
    Cancelled,
}

/// Complete dialog view state
#[derive(Debug, Clone)]
pub struct DialogState {
    pub view: DialogView,
    pub subscribe: PageStatus,
    pub login: PageStatus,
    pub subscribe_form: SubscribeForm,
    pub login_form: LoginForm,
    pub positive_enabled: bool,
    /// A subscribe validation is running for the current input
    pub validation_pending: bool,
    /// Login checks started since the dialog opened
    pub login_attempts: u32,
    pub focus: Field,
    pub camera: CameraState,
    pub instant_delivery: InstantDeliveryView,
    pub settings: DeliverySettings,
    pub outcome: Option<DialogOutcome>,
}

impl DialogState {
    pub fn new(settings: DeliverySettings) -> Self {
        let instant_delivery = InstantDeliveryView::compute(&settings, false);
        Self {
            view: DialogView::Subscribe,
            subscribe: PageStatus {
                inputs_enabled: true,
                ..PageStatus::default()
            },
            login: PageStatus {
                inputs_enabled: true,
                ..PageStatus::default()
            },
            subscribe_form: SubscribeForm::default(),
            login_form: LoginForm::default(),
            // 等待首次校验
            positive_enabled: false,
            validation_pending: false,
            login_attempts: 0,
            focus: Field::Topic,
            camera: CameraState::AwaitingPermission,
            instant_delivery,
            settings,
            outcome: None,
        }
    }

    pub fn positive_label(&self) -> &'static str {
        match self.view {
            DialogView::Subscribe => "Subscribe",
            DialogView::Login => "Login",
        }
    }

    pub fn negative_label(&self) -> &'static str {
        match self.view {
            DialogView::Subscribe => "Cancel",
            DialogView::Login => "Back",
        }
    }

    /// Cancel is always possible; Back is blocked while a login check runs.
    pub fn negative_enabled(&self) -> bool {
        match self.view {
            DialogView::Subscribe => true,
            DialogView::Login => !self.login.progress,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.outcome.is_some()
    }

    /// An authorization check is in flight on the visible page.
    pub fn is_busy(&self) -> bool {
        match self.view {
            DialogView::Subscribe => self.subscribe.progress,
            DialogView::Login => self.login.progress,
        }
    }

    /// Whether the visible page accepts field edits.
    pub fn accepts_input(&self) -> bool {
        !self.is_closed()
            && match self.view {
                DialogView::Subscribe => self.subscribe.inputs_enabled,
                DialogView::Login => self.login.inputs_enabled,
            }
    }

    /// Base URL the subscribe page targets.
    pub fn base_url(&self) -> String {
        self.settings.effective_base_url(
            self.subscribe_form.use_another_server,
            &self.subscribe_form.base_url,
        )
    }

    pub fn is_instant(&self, base_url: &str) -> bool {
        self.settings
            .is_instant(base_url, self.subscribe_form.instant_delivery)
    }

    pub fn refresh_instant_view(&mut self) {
        self.instant_delivery =
            InstantDeliveryView::compute(&self.settings, self.subscribe_form.instant_delivery);
    }

    // ===== Subscribe page =====

    fn enable_subscribe(&mut self, enable: bool) {
        self.subscribe.inputs_enabled = enable;
        self.positive_enabled = enable;
    }

    pub fn begin_subscribe_check(&mut self) {
        self.subscribe.progress = true;
        self.subscribe.error = None;
        self.enable_subscribe(false);
    }

    pub fn fail_subscribe(&mut self, message: String) {
        self.subscribe.progress = false;
        self.subscribe.error = Some(message);
        self.enable_subscribe(true);
    }

    /// Apply the latest subscribe validation result.
    ///
    /// Ignored while a check is in flight or the login page is visible.
    pub fn apply_subscribe_validation(&mut self, valid: bool) -> bool {
        if self.view != DialogView::Subscribe || self.subscribe.progress || self.is_closed() {
            return false;
        }
        self.positive_enabled = valid;
        true
    }

    /// Login -> Subscribe. Positive stays disabled until revalidation.
    pub fn show_subscribe(&mut self) {
        self.subscribe.reset();
        self.login.progress = false;
        self.login.error = None;
        self.view = DialogView::Subscribe;
        self.positive_enabled = false;
        self.focus = Field::Topic;
    }

    // ===== Login page =====

    /// Subscribe -> Login with cleared credentials and focus on username.
    pub fn show_login(&mut self) {
        self.login.reset();
        self.login_form = LoginForm::default();
        self.subscribe.progress = false;
        self.subscribe.error = None;
        self.subscribe.inputs_enabled = true;
        self.view = DialogView::Login;
        self.focus = Field::Username;
        self.apply_login_input();
    }

    pub fn begin_login_check(&mut self) {
        self.login_attempts = self.login_attempts.saturating_add(1);
        self.login.progress = true;
        self.login.error = None;
        self.login.inputs_enabled = false;
        self.positive_enabled = false;
    }

    pub fn fail_login(&mut self, message: String) {
        self.login.progress = false;
        self.login.error = Some(message);
        self.login.inputs_enabled = true;
        self.focus = Field::Username;
        self.apply_login_input();
    }

    /// Positive enabled iff username and password are non-empty.
    pub fn apply_login_input(&mut self) {
        if self.view == DialogView::Login && !self.login.progress && !self.is_closed() {
            self.positive_enabled =
                login_input_valid(&self.login_form.username, &self.login_form.password);
        }
    }

    // ===== Terminal =====

    pub fn close(&mut self, outcome: DialogOutcome) {
        self.subscribe.progress = false;
        self.login.progress = false;
        self.positive_enabled = false;
        self.outcome = Some(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> DialogState {
        DialogState::new(DeliverySettings::default())
    }

    #[test]
    fn starts_on_subscribe_page_disabled() {
        let s = state();
        assert_eq!(s.view, DialogView::Subscribe);
        assert!(!s.positive_enabled);
        assert_eq!(s.positive_label(), "Subscribe");
        assert_eq!(s.negative_label(), "Cancel");
        assert!(s.accepts_input());
        assert_eq!(s.camera, CameraState::AwaitingPermission);
    }

    #[test]
    fn busy_subscribe_ignores_validation() {
        let mut s = state();
        s.begin_subscribe_check();
        assert!(s.is_busy());
        assert!(!s.accepts_input());
        assert!(!s.apply_subscribe_validation(true));
        assert!(!s.positive_enabled);
    }

    #[test]
    fn failed_subscribe_reenables_inputs() {
        let mut s = state();
        s.begin_subscribe_check();
        s.fail_subscribe("connection refused".into());
        assert!(!s.is_busy());
        assert!(s.positive_enabled);
        assert_eq!(s.subscribe.error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn show_login_resets_login_page() {
        let mut s = state();
        s.login_form.username = "old".into();
        s.login.error = Some("stale".into());
        s.begin_subscribe_check();

        s.show_login();

        assert_eq!(s.view, DialogView::Login);
        assert_eq!(s.positive_label(), "Login");
        assert_eq!(s.negative_label(), "Back");
        assert_eq!(s.focus, Field::Username);
        assert!(s.login_form.username.is_empty());
        assert!(s.login.error.is_none());
        assert!(!s.subscribe.progress);
        assert!(!s.positive_enabled);
    }

    #[test]
    fn login_positive_tracks_fields() {
        let mut s = state();
        s.show_login();

        s.login_form.username = "phil".into();
        s.apply_login_input();
        assert!(!s.positive_enabled);

        s.login_form.password = "pw".into();
        s.apply_login_input();
        assert!(s.positive_enabled);

        s.login_form.username.clear();
        s.apply_login_input();
        assert!(!s.positive_enabled);
    }

    #[test]
    fn back_is_blocked_during_login_check() {
        let mut s = state();
        s.show_login();
        s.begin_login_check();
        assert_eq!(s.login_attempts, 1);
        assert!(!s.negative_enabled());
        s.fail_login("Login failed. User phil not authorized.".into());
        assert!(s.negative_enabled());
    }

    #[test]
    fn show_subscribe_clears_both_pages() {
        let mut s = state();
        s.show_login();
        s.login.error = Some("nope".into());

        s.show_subscribe();

        assert_eq!(s.view, DialogView::Subscribe);
        assert!(s.login.error.is_none());
        assert!(s.subscribe.error.is_none());
        assert_eq!(s.focus, Field::Topic);
        assert!(!s.positive_enabled);
    }

    #[test]
    fn instant_view_follows_settings() {
        let mut s = state();
        assert!(s.instant_delivery.toggle_visible);
        assert!(!s.instant_delivery.description_visible);

        s.subscribe_form.instant_delivery = true;
        s.refresh_instant_view();
        assert!(s.instant_delivery.description_visible);

        let mut hosted = DialogState::new(DeliverySettings {
            default_base_url: Some("https://self.hosted".into()),
            ..DeliverySettings::default()
        });
        hosted.refresh_instant_view();
        assert!(!hosted.instant_delivery.toggle_visible);
        assert!(hosted.instant_delivery.foreground_description_visible);
    }

    #[test]
    fn login_form_debug_hides_password() {
        let form = LoginForm {
            username: "phil".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{form:?}").contains("hunter2"));
    }
}
