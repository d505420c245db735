use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub status: CommandStatus,
    pub message: String,
    #[serde(default)]
    pub details: Value,
}

impl ExecutionOutcome {
    pub fn success(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::Ok,
            message: message.into(),
            details,
        }
    }

    pub fn failure(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::Failure,
            message: message.into(),
            details,
        }
    }

    pub fn user_error(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::UserError,
            message: message.into(),
            details,
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == CommandStatus::Ok
    }

    /// Process exit code carried in the details, if a step reported one.
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        self.details
            .as_object()
            .and_then(|map| map.get("code"))
            .and_then(Value::as_i64)
            .and_then(|code| i32::try_from(code).ok())
    }

    /// Exit status the dispatcher should terminate with.
    #[must_use]
    pub fn process_exit_code(&self) -> i32 {
        let fallback = match self.status {
            CommandStatus::Ok => 0,
            CommandStatus::UserError => 1,
            CommandStatus::Failure => 2,
        };
        self.exit_code().unwrap_or(fallback)
    }

    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        self.details
            .as_object()
            .and_then(|map| map.get("hint"))
            .and_then(Value::as_str)
    }

    /// Merges `extra` into the details object, replacing keys that already exist.
    pub(crate) fn with_details(mut self, extra: Value) -> Self {
        if !self.details.is_object() {
            self.details = json!({});
        }
        if let (Some(target), Value::Object(extra)) = (self.details.as_object_mut(), extra) {
            for (key, value) in extra {
                target.insert(key, value);
            }
        }
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CommandStatus {
    Ok,
    UserError,
    Failure,
}

impl CommandStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CommandStatus::Ok => "ok",
            CommandStatus::UserError => "user-error",
            CommandStatus::Failure => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_prefers_reported_process_code() {
        let outcome = ExecutionOutcome::failure("boom", json!({ "code": 42 }));
        assert_eq!(outcome.process_exit_code(), 42);

        let outcome = ExecutionOutcome::failure("boom", json!({}));
        assert_eq!(outcome.process_exit_code(), 2);

        let outcome = ExecutionOutcome::user_error("nope", Value::Null);
        assert_eq!(outcome.process_exit_code(), 1);
    }

    #[test]
    fn with_details_overrides_existing_keys() {
        let outcome = ExecutionOutcome::success("done", json!({ "step": "build", "a": 1 }))
            .with_details(json!({ "step": "deploy" }));
        assert_eq!(outcome.details["step"], "deploy");
        assert_eq!(outcome.details["a"], 1);

        let outcome = ExecutionOutcome::success("done", Value::Null).with_details(json!({ "b": 2 }));
        assert_eq!(outcome.details["b"], 2);
    }
}
