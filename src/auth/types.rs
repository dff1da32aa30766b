use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub sub: String, // user id
    pub exp: usize,  // expiration time
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginAttemptState {
    pub failure_count: u32,
    pub lockout_until: Option<DateTime<Utc>>,
    /// 最近一次登录尝试的时间，清理时判断记录是否过期
    pub last_attempt: Option<DateTime<Utc>>,
}

impl LoginAttemptState {
    pub fn reset(&mut self) {
        self.failure_count = 0;
        self.lockout_until = None;
    }

    /// 锁定已过期，或者没有锁定且超过 `window` 没有新的尝试，可以从表里移除
    pub fn is_idle(&self, now: DateTime<Utc>, window: Duration) -> bool {
        match self.lockout_until {
            Some(until) => until <= now,
            None => {
                self.failure_count == 0
                    || self.last_attempt.map_or(true, |last| now - last >= window)
            }
        }
    }
}
