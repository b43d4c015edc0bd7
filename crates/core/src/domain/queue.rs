// Queue Domain Model

use super::error::{DomainError, Result};
use std::time::Duration;

/// Queue identifier (top-level key of the configuration file)
pub type QueueId = String;

/// Raw queue parameters as read from configuration, before validation.
///
/// Numbers stay string-encoded here; a missing field is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueParams {
    pub processes: String,
    pub interval: String,
    pub environment: String,
    pub project: String,
}

impl QueueParams {
    pub fn new(
        processes: impl Into<String>,
        interval: impl Into<String>,
        environment: impl Into<String>,
        project: impl Into<String>,
    ) -> Self {
        Self {
            processes: processes.into(),
            interval: interval.into(),
            environment: environment.into(),
            project: project.into(),
        }
    }
}

/// Validated, immutable definition of one queue.
///
/// Every field is valid at once or the spec does not exist: there is no
/// partially configured queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueSpec {
    name: QueueId,
    worker_count: usize,
    interval_secs: u64,
    environment: String,
    project: String,
}

impl QueueSpec {
    /// Validate and build a queue spec
    ///
    /// # Errors
    /// `DomainError::InvalidQueueSpec` when a count is below 1 or a string is empty
    pub fn new(
        name: impl Into<String>,
        worker_count: i64,
        interval_secs: i64,
        environment: impl Into<String>,
        project: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        let environment = environment.into();
        let project = project.into();

        let invalid = |reason: &str| DomainError::InvalidQueueSpec {
            queue: name.clone(),
            reason: reason.to_string(),
        };

        if name.is_empty() {
            return Err(invalid("queue name is empty"));
        }
        if worker_count < 1 {
            return Err(invalid("processes must be at least 1"));
        }
        if interval_secs < 1 {
            return Err(invalid("interval must be at least 1 second"));
        }
        if environment.is_empty() {
            return Err(invalid("environment is empty"));
        }
        if project.is_empty() {
            return Err(invalid("project is empty"));
        }

        Ok(Self {
            name,
            worker_count: worker_count as usize,
            interval_secs: interval_secs as u64,
            environment,
            project,
        })
    }

    /// Parse string-encoded parameters, then validate
    pub fn from_params(name: impl Into<String>, params: &QueueParams) -> Result<Self> {
        let name = name.into();
        let worker_count = parse_number(&name, "processes", &params.processes)?;
        let interval_secs = parse_number(&name, "interval", &params.interval)?;
        Self::new(
            name,
            worker_count,
            interval_secs,
            params.environment.as_str(),
            params.project.as_str(),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn project(&self) -> &str {
        &self.project
    }
}

fn parse_number(queue: &str, field: &'static str, value: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| DomainError::InvalidNumber {
            queue: queue.to_string(),
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_spec() {
        let spec = QueueSpec::new("emails", 3, 10, "prod", "shop").unwrap();
        assert_eq!(spec.name(), "emails");
        assert_eq!(spec.worker_count(), 3);
        assert_eq!(spec.interval(), Duration::from_secs(10));
        assert_eq!(spec.environment(), "prod");
        assert_eq!(spec.project(), "shop");
    }

    #[test]
    fn test_rejects_each_invalid_field() {
        let cases = [
            ("", 1, 1, "dev", "p"),
            ("q", 0, 1, "dev", "p"),
            ("q", -2, 1, "dev", "p"),
            ("q", 1, 0, "dev", "p"),
            ("q", 1, 1, "", "p"),
            ("q", 1, 1, "dev", ""),
        ];
        for (name, workers, interval, env, project) in cases {
            let result = QueueSpec::new(name, workers, interval, env, project);
            assert!(
                matches!(result, Err(DomainError::InvalidQueueSpec { .. })),
                "expected rejection for {:?}",
                (name, workers, interval, env, project)
            );
        }
    }

    #[test]
    fn test_from_params_parses_strings() {
        let params = QueueParams::new("2", " 5 ", "dev", "p");
        let spec = QueueSpec::from_params("q1", &params).unwrap();
        assert_eq!(spec.worker_count(), 2);
        assert_eq!(spec.interval_secs(), 5);
    }

    #[test]
    fn test_from_params_rejects_non_numeric() {
        let params = QueueParams::new("two", "5", "dev", "p");
        let err = QueueSpec::from_params("q1", &params).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidNumber {
                queue: "q1".to_string(),
                field: "processes",
                value: "two".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_fields_are_invalid() {
        let err = QueueSpec::from_params("q1", &QueueParams::default()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidNumber { field: "processes", .. }));
    }
}
