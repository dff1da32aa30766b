use chrono::{DateTime, Duration, Local, Utc};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::types::LoginAttemptState;
use crate::error::ApiError;

/// 连续失败多少次后锁定
pub const MAX_LOGIN_ATTEMPTS: u32 = 5;
/// 锁定时长（分钟）
pub const LOCKOUT_MINUTES: i64 = 30;

const GLOBAL_KEY: &str = "*";

/// 登录失败计数的统计范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardScope {
    /// 每个账号（邮箱）单独计数
    PerIdentifier,
    /// 整个进程共用一个计数器
    Global,
}

/// 登录防爆破守卫。
///
/// 每个 key 对应一把异步锁，检查状态、校验密码、更新计数在同一个临界区内完成，
/// 并发请求不会丢失计数，也无法绕过锁定。
pub struct LoginGuard {
    attempts: Mutex<HashMap<String, Arc<Mutex<LoginAttemptState>>>>,
    scope: GuardScope,
    max_attempts: u32,
    lockout: Duration,
}

impl LoginGuard {
    pub fn new(scope: GuardScope) -> Self {
        Self::with_limits(scope, MAX_LOGIN_ATTEMPTS, Duration::minutes(LOCKOUT_MINUTES))
    }

    pub fn with_limits(scope: GuardScope, max_attempts: u32, lockout: Duration) -> Self {
        info!(
            "初始化登录守卫: 范围 {:?}, 最大失败次数 {}, 锁定 {} 分钟",
            scope,
            max_attempts,
            lockout.num_minutes()
        );
        Self {
            attempts: Mutex::new(HashMap::new()),
            scope,
            max_attempts,
            lockout,
        }
    }

    fn key(&self, identifier: &str) -> String {
        match self.scope {
            GuardScope::PerIdentifier => identifier.trim().to_lowercase(),
            GuardScope::Global => GLOBAL_KEY.to_string(),
        }
    }

    async fn entry(&self, identifier: &str) -> Arc<Mutex<LoginAttemptState>> {
        let mut attempts = self.attempts.lock().await;
        attempts
            .entry(self.key(identifier))
            .or_insert_with(|| Arc::new(Mutex::new(LoginAttemptState::default())))
            .clone()
    }

    pub async fn attempt<T, F, Fut>(&self, identifier: &str, verify: F) -> Result<T, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>, ApiError>>,
    {
        self.attempt_at(identifier, Utc::now(), verify).await
    }

    /// 执行一次登录尝试。
    ///
    /// `verify` 返回 `Ok(None)` 表示账号或密码错误；返回 `Err` 表示校验本身出错，
    /// 此时错误原样返回，计数不变。
    pub async fn attempt_at<T, F, Fut>(
        &self,
        identifier: &str,
        now: DateTime<Utc>,
        verify: F,
    ) -> Result<T, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>, ApiError>>,
    {
        let entry = self.entry(identifier).await;
        let mut state = entry.lock().await;
        state.last_attempt = Some(now);
        let stamp = now
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        debug!(
            "检查用户 {} 的登录尝试次数: {}",
            identifier, state.failure_count
        );

        if let Some(until) = state.lockout_until {
            if until > now {
                let minutes = ((until - now).num_seconds() + 59) / 60;
                warn!(
                    "[{}] 用户 {} 仍处于锁定中，失败次数: {}",
                    stamp, identifier, state.failure_count
                );
                return Err(ApiError::RateLimited(format!(
                    "[{}] 用户 {} 登录失败次数过多，请在 {} 分钟后再试",
                    stamp, identifier, minutes
                )));
            }

            state.reset();
            info!("[{}] 用户 {} 的锁定已过期，可以重新登录", stamp, identifier);
        }

        if state.failure_count >= self.max_attempts {
            state.lockout_until = Some(now + self.lockout);
            warn!(
                "[{}] 用户 {} 超过登录次数限制，锁定 {} 分钟，失败次数: {}",
                stamp,
                identifier,
                self.lockout.num_minutes(),
                state.failure_count
            );
            return Err(ApiError::RateLimited(format!(
                "[{}] 用户 {} 尝试登录，但已超过登录次数限制，请在 {} 分钟后再试",
                stamp,
                identifier,
                self.lockout.num_minutes()
            )));
        }

        match verify().await? {
            Some(verified) => {
                state.reset();
                info!("[{}] 用户 {} 登录成功，失败次数已重置", stamp, identifier);
                Ok(verified)
            }
            None => {
                state.failure_count += 1;
                warn!(
                    "[{}] 用户 {} 登录失败，当前失败次数: {}",
                    stamp, identifier, state.failure_count
                );
                Err(ApiError::InvalidCredentials(format!(
                    "[{}] 用户 {} 登录失败，失败次数 = {}",
                    stamp, identifier, state.failure_count
                )))
            }
        }
    }

    /// 当前状态的快照
    pub async fn snapshot(&self, identifier: &str) -> LoginAttemptState {
        let entry = {
            let attempts = self.attempts.lock().await;
            attempts.get(&self.key(identifier)).cloned()
        };
        match entry {
            Some(entry) => entry.lock().await.clone(),
            None => LoginAttemptState::default(),
        }
    }

    /// 清理空闲记录，返回清理的条数
    pub async fn cleanup_expired(&self, now: DateTime<Utc>) -> usize {
        debug!("清理过期的登录尝试记录");
        let mut attempts = self.attempts.lock().await;
        let before_count = attempts.len();
        // 持有外层锁时引用计数为 1，说明没有请求正在使用这条记录
        attempts.retain(|_, entry| {
            if Arc::strong_count(entry) > 1 {
                return true;
            }
            match entry.try_lock() {
                Ok(state) => !state.is_idle(now, self.lockout),
                Err(_) => true,
            }
        });
        let removed = before_count - attempts.len();
        info!("清理了 {} 条登录尝试记录", removed);
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const EMAIL: &str = "user@example.com";

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-01T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    async fn try_login(
        guard: &LoginGuard,
        identifier: &str,
        now: DateTime<Utc>,
        correct: bool,
        calls: &AtomicUsize,
    ) -> Result<&'static str, ApiError> {
        guard
            .attempt_at(identifier, now, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(if correct { Some("token") } else { None })
            })
            .await
    }

    #[tokio::test]
    async fn test_lockout_after_max_failures() {
        let guard = LoginGuard::new(GuardScope::PerIdentifier);
        let calls = AtomicUsize::new(0);
        let now = start();

        for i in 1..=5 {
            let result = try_login(&guard, EMAIL, now, false, &calls).await;
            assert!(matches!(result, Err(ApiError::InvalidCredentials(_))), "attempt {}", i);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 5);

        // 第一次超过阈值：设置锁定，不调用校验
        let result = try_login(&guard, EMAIL, now, true, &calls).await;
        assert!(matches!(result, Err(ApiError::RateLimited(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 5);

        // 锁定期内，正确密码也被拒绝
        let result = try_login(&guard, EMAIL, now + Duration::minutes(29), true, &calls).await;
        assert!(matches!(result, Err(ApiError::RateLimited(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 5);

        let state = guard.snapshot(EMAIL).await;
        assert_eq!(state.failure_count, 5);
        assert_eq!(state.lockout_until, Some(now + Duration::minutes(30)));
    }

    #[tokio::test]
    async fn test_lockout_expires() {
        let guard = LoginGuard::new(GuardScope::PerIdentifier);
        let calls = AtomicUsize::new(0);
        let now = start();

        for _ in 0..5 {
            let _ = try_login(&guard, EMAIL, now, false, &calls).await;
        }
        let _ = try_login(&guard, EMAIL, now, false, &calls).await;
        let until = guard.snapshot(EMAIL).await.lockout_until.unwrap();

        let result = try_login(&guard, EMAIL, until + Duration::milliseconds(1), true, &calls).await;
        assert_eq!(result.unwrap(), "token");
        assert_eq!(calls.load(Ordering::SeqCst), 6);
        let state = guard.snapshot(EMAIL).await;
        assert_eq!(state.failure_count, 0);
        assert_eq!(state.lockout_until, None);
    }

    #[tokio::test]
    async fn test_expired_lockout_counts_fresh_failures() {
        let guard = LoginGuard::new(GuardScope::PerIdentifier);
        let calls = AtomicUsize::new(0);
        let now = start();

        for _ in 0..6 {
            let _ = try_login(&guard, EMAIL, now, false, &calls).await;
        }
        let later = now + Duration::minutes(31);
        let result = try_login(&guard, EMAIL, later, false, &calls).await;
        assert!(matches!(result, Err(ApiError::InvalidCredentials(_))));
        assert_eq!(guard.snapshot(EMAIL).await.failure_count, 1);
    }

    #[tokio::test]
    async fn test_success_before_threshold_resets() {
        let guard = LoginGuard::new(GuardScope::PerIdentifier);
        let calls = AtomicUsize::new(0);
        let now = start();

        for _ in 0..4 {
            let _ = try_login(&guard, EMAIL, now, false, &calls).await;
        }
        assert_eq!(guard.snapshot(EMAIL).await.failure_count, 4);

        let result = try_login(&guard, EMAIL, now, true, &calls).await;
        assert!(result.is_ok());
        let state = guard.snapshot(EMAIL).await;
        assert_eq!(state.failure_count, 0);
        assert_eq!(state.lockout_until, None);
    }

    #[tokio::test]
    async fn test_verifier_error_leaves_state() {
        let guard = LoginGuard::new(GuardScope::PerIdentifier);
        let now = start();

        let result: Result<(), ApiError> = guard
            .attempt_at(EMAIL, now, || async { Err(ApiError::Database("down".into())) })
            .await;
        assert!(matches!(result, Err(ApiError::Database(_))));
        assert_eq!(guard.snapshot(EMAIL).await.failure_count, 0);
    }

    #[tokio::test]
    async fn test_per_identifier_isolation() {
        let guard = LoginGuard::new(GuardScope::PerIdentifier);
        let calls = AtomicUsize::new(0);
        let now = start();

        for _ in 0..6 {
            let _ = try_login(&guard, "attacker@example.com", now, false, &calls).await;
        }
        let result = try_login(&guard, EMAIL, now, true, &calls).await;
        assert!(result.is_ok());

        // 大小写和空白不影响计数
        let result = try_login(&guard, " Attacker@Example.com", now, true, &calls).await;
        assert!(matches!(result, Err(ApiError::RateLimited(_))));
    }

    #[tokio::test]
    async fn test_global_scope_shares_state() {
        let guard = LoginGuard::new(GuardScope::Global);
        let calls = AtomicUsize::new(0);
        let now = start();

        for i in 0..6 {
            let identifier = format!("user{}@example.com", i);
            let _ = try_login(&guard, &identifier, now, false, &calls).await;
        }
        let result = try_login(&guard, EMAIL, now, true, &calls).await;
        assert!(matches!(result, Err(ApiError::RateLimited(_))));
    }

    #[tokio::test]
    async fn test_concurrent_failures_are_not_lost() {
        let guard = Arc::new(LoginGuard::with_limits(
            GuardScope::PerIdentifier,
            1000,
            Duration::minutes(30),
        ));
        let now = start();

        let mut handles = Vec::new();
        for _ in 0..50 {
            let guard = guard.clone();
            handles.push(tokio::spawn(async move {
                let _: Result<(), ApiError> = guard
                    .attempt_at(EMAIL, now, || async {
                        tokio::task::yield_now().await;
                        Ok(None)
                    })
                    .await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(guard.snapshot(EMAIL).await.failure_count, 50);
    }

    #[tokio::test]
    async fn test_concurrent_attempts_cannot_bypass_lockout() {
        let guard = Arc::new(LoginGuard::new(GuardScope::PerIdentifier));
        let calls = Arc::new(AtomicUsize::new(0));
        let now = start();

        let mut handles = Vec::new();
        for _ in 0..20 {
            let guard = guard.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                let _: Result<(), ApiError> = guard
                    .attempt_at(EMAIL, now, || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::task::yield_now().await;
                        Ok(None)
                    })
                    .await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 5);
        assert!(guard.snapshot(EMAIL).await.lockout_until.is_some());
    }

    #[tokio::test]
    async fn test_cleanup_expired() {
        let guard = LoginGuard::new(GuardScope::PerIdentifier);
        let calls = AtomicUsize::new(0);
        let now = start();

        let _ = try_login(&guard, "ok@example.com", now, true, &calls).await;
        let _ = try_login(&guard, "bad@example.com", now, false, &calls).await;
        for _ in 0..6 {
            let _ = try_login(&guard, "locked@example.com", now, false, &calls).await;
        }

        assert_eq!(guard.cleanup_expired(now).await, 1);
        assert_eq!(guard.snapshot("bad@example.com").await.failure_count, 1);

        // 锁定过期、失败记录过期后都会被清理
        assert_eq!(guard.cleanup_expired(now + Duration::minutes(31)).await, 2);
        assert_eq!(guard.snapshot("locked@example.com").await, LoginAttemptState::default());
        assert_eq!(guard.snapshot("bad@example.com").await, LoginAttemptState::default());
    }

    #[tokio::test]
    async fn test_cleanup_evicts_one_off_failures() {
        let guard = LoginGuard::new(GuardScope::PerIdentifier);
        let calls = AtomicUsize::new(0);
        let now = start();

        for i in 0..1000 {
            let identifier = format!("random{}@example.com", i);
            let _ = try_login(&guard, &identifier, now, false, &calls).await;
        }

        assert_eq!(guard.cleanup_expired(now + Duration::minutes(10)).await, 0);
        assert_eq!(guard.cleanup_expired(now + Duration::minutes(30)).await, 1000);
        assert!(guard.attempts.lock().await.is_empty());
    }
}
