//! 访问守卫
//!
//! 状态机：`Loading -> { Allowed -> 渲染, Denied -> 通知 + 重定向 }`。
//! 守卫本身不关心呈现方式，拒绝时通过 [`DenialHandler`] 交给下游协作者。

use uuid::Uuid;

use crate::config::AccessConfig;
use crate::models::{AccessLevel, Capabilities, Notice};

/// 守卫状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Loading,
    Allowed,
    Denied,
}

impl GuardState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GuardState::Loading => "loading",
            GuardState::Allowed => "allowed",
            GuardState::Denied => "denied",
        }
    }
}

/// 一次守卫评估的输入
#[derive(Debug, Clone, Copy)]
pub struct GuardRequest {
    pub level: AccessLevel,
    pub owner_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub capabilities: Capabilities,
    pub loading: bool,
}

/// 拒绝时的下游协作者（通知 + 导航）
pub trait DenialHandler {
    fn notify(&mut self, notice: &Notice);
    fn redirect(&mut self, location: &str);
}

/// 守卫结果
#[derive(Debug, PartialEq, Eq)]
pub enum GuardOutcome<T> {
    /// 数据仍在加载，显示中性的加载指示
    Loading,
    Render(T),
    Redirected,
}

#[derive(Debug, Clone)]
pub struct AccessGuard {
    landing_route: String,
    notice: Notice,
}

impl AccessGuard {
    pub fn new(landing_route: impl Into<String>, notice: Notice) -> Self {
        Self {
            landing_route: landing_route.into(),
            notice,
        }
    }

    pub fn from_config(config: &AccessConfig) -> Self {
        Self::new(
            config.landing_route.clone(),
            Notice::destructive(&config.denied_title, &config.denied_description),
        )
    }

    /// 加载中永远不会被报告为拒绝
    pub fn evaluate(&self, request: &GuardRequest) -> GuardState {
        let state = if request.loading {
            GuardState::Loading
        } else if request.level.permits(
            &request.capabilities,
            request.user_id,
            request.owner_id,
            false,
        ) {
            GuardState::Allowed
        } else {
            GuardState::Denied
        };

        metrics::counter!(
            "access_decisions_total",
            "level" => request.level.as_str(),
            "outcome" => state.as_str()
        )
        .increment(1);

        state
    }

    /// 评估并执行对应的副作用；仅在允许时才调用 `content`
    pub fn resolve<T, H, F>(&self, request: &GuardRequest, handler: &mut H, content: F) -> GuardOutcome<T>
    where
        H: DenialHandler,
        F: FnOnce() -> T,
    {
        match self.evaluate(request) {
            GuardState::Loading => GuardOutcome::Loading,
            GuardState::Allowed => GuardOutcome::Render(content()),
            GuardState::Denied => {
                tracing::warn!(
                    user_id = ?request.user_id,
                    owner_id = ?request.owner_id,
                    level = %request.level,
                    "Access denied"
                );
                handler.notify(&self.notice);
                handler.redirect(&self.landing_route);
                GuardOutcome::Redirected
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    enum Event {
        Notify(String),
        Redirect(String),
    }

    // 按调用顺序记录副作用
    #[derive(Default)]
    struct Recorder {
        events: Vec<Event>,
    }

    impl DenialHandler for Recorder {
        fn notify(&mut self, notice: &Notice) {
            self.events.push(Event::Notify(notice.title.clone()));
        }

        fn redirect(&mut self, location: &str) {
            self.events.push(Event::Redirect(location.to_string()));
        }
    }

    fn guard() -> AccessGuard {
        AccessGuard::new("/dashboard", Notice::destructive("Acesso negado", "Sem permissão"))
    }

    fn request(loading: bool, owner: Option<Uuid>, user: Option<Uuid>) -> GuardRequest {
        GuardRequest {
            level: AccessLevel::Edit,
            owner_id: owner,
            user_id: user,
            capabilities: Capabilities::none(),
            loading,
        }
    }

    #[test]
    fn test_loading_renders_nothing_and_has_no_side_effects() {
        let mut recorder = Recorder::default();
        let outcome = guard().resolve(&request(true, None, None), &mut recorder, || "secret");

        assert_eq!(outcome, GuardOutcome::Loading);
        assert!(recorder.events.is_empty());
    }

    #[test]
    fn test_denied_notifies_then_redirects() {
        let mut recorder = Recorder::default();
        let outcome = guard().resolve(
            &request(false, Some(Uuid::new_v4()), Some(Uuid::new_v4())),
            &mut recorder,
            || "secret",
        );

        assert_eq!(outcome, GuardOutcome::Redirected);
        assert_eq!(
            recorder.events,
            vec![
                Event::Notify("Acesso negado".to_string()),
                Event::Redirect("/dashboard".to_string()),
            ]
        );
    }

    #[test]
    fn test_allowed_renders_content_unmodified() {
        let id = Some(Uuid::new_v4());
        let mut recorder = Recorder::default();
        let outcome = guard().resolve(&request(false, id, id), &mut recorder, || "secret");

        assert_eq!(outcome, GuardOutcome::Render("secret"));
        assert!(recorder.events.is_empty());
    }
}
