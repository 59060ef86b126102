//! Usage projector.
//!
//! Derives monthly usage from a handful of infrastructure and application
//! shape parameters. Every output is rounded to a whole unit; pricing never
//! rounds again until the final ceiling to a billing step.

use serde::{Deserialize, Serialize};

use crate::error::{PricingError, Result};
use crate::ids::{dims, DimensionId};
use crate::usage::{sanitize_quantity, UsageQuantities};

/// Infrastructure and application parameters the projector works from.
///
/// Missing fields deserialize to zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorShape {
    /// Monitored hosts / nodes.
    pub host_count: f64,
    /// Average daily log volume per host, in GB.
    pub avg_daily_logs_per_host_gb: f64,
    /// Instrumented application instances.
    pub app_instance_count: f64,
    /// Average active series per application instance.
    pub avg_series_per_app_instance: f64,
    /// Average daily trace volume per application instance, in GB.
    pub avg_daily_traces_per_app_instance_gb: f64,
    /// Average daily log volume per application instance, in GB.
    pub avg_daily_logs_per_app_instance_gb: f64,
}

impl Default for EstimatorShape {
    fn default() -> Self {
        Self::empty()
    }
}

impl EstimatorShape {
    /// A shape with every parameter at zero.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            host_count: 0.0,
            avg_daily_logs_per_host_gb: 0.0,
            app_instance_count: 0.0,
            avg_series_per_app_instance: 0.0,
            avg_daily_traces_per_app_instance_gb: 0.0,
            avg_daily_logs_per_app_instance_gb: 0.0,
        }
    }

    /// Starting point for interactive estimation: a small cluster of five
    /// hosts running twenty instrumented instances.
    #[must_use]
    pub const fn typical() -> Self {
        Self {
            host_count: 5.0,
            avg_daily_logs_per_host_gb: 0.2,
            app_instance_count: 20.0,
            avg_series_per_app_instance: 450.0,
            avg_daily_traces_per_app_instance_gb: 0.5,
            avg_daily_logs_per_app_instance_gb: 0.1,
        }
    }

    /// Copy of the shape with every field clamped to a finite, non-negative
    /// value.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        Self {
            host_count: sanitize_quantity(self.host_count),
            avg_daily_logs_per_host_gb: sanitize_quantity(self.avg_daily_logs_per_host_gb),
            app_instance_count: sanitize_quantity(self.app_instance_count),
            avg_series_per_app_instance: sanitize_quantity(self.avg_series_per_app_instance),
            avg_daily_traces_per_app_instance_gb: sanitize_quantity(
                self.avg_daily_traces_per_app_instance_gb,
            ),
            avg_daily_logs_per_app_instance_gb: sanitize_quantity(
                self.avg_daily_logs_per_app_instance_gb,
            ),
        }
    }
}

/// Dimensions the projector writes into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionTargets {
    /// Combined active series.
    pub series: DimensionId,
    /// Combined monthly logs.
    pub logs: DimensionId,
    /// Monthly traces.
    pub traces: DimensionId,
    /// Infrastructure host-hours.
    pub host_hours: DimensionId,
    /// Derived container-hours.
    pub container_hours: DimensionId,
    /// Application host-hours.
    pub app_host_hours: DimensionId,
}

impl Default for ProjectionTargets {
    fn default() -> Self {
        Self {
            series: DimensionId::from_static(dims::METRICS),
            logs: DimensionId::from_static(dims::LOGS),
            traces: DimensionId::from_static(dims::TRACES),
            host_hours: DimensionId::from_static(dims::K8S_HOST_HOURS),
            container_hours: DimensionId::from_static(dims::K8S_CONTAINER_HOURS),
            app_host_hours: DimensionId::from_static(dims::APP_HOST_HOURS),
        }
    }
}

impl ProjectionTargets {
    /// Iterate over all target ids.
    pub fn iter(&self) -> impl Iterator<Item = &DimensionId> {
        [
            &self.series,
            &self.logs,
            &self.traces,
            &self.host_hours,
            &self.container_hours,
            &self.app_host_hours,
        ]
        .into_iter()
    }
}

/// Heuristic constants of the projector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConstants {
    /// Active series per monitored host (node exporter and system metrics).
    pub series_per_host: f64,
    /// Days used to turn daily volumes into monthly ones.
    pub days_per_month: f64,
    /// Hours a host runs per month.
    pub hours_per_month: f64,
    /// Containers assumed per host.
    pub containers_per_host: f64,
    /// Dimensions receiving projected values.
    pub targets: ProjectionTargets,
}

impl Default for ProjectionConstants {
    fn default() -> Self {
        Self {
            series_per_host: 1_500.0,
            days_per_month: 30.0,
            hours_per_month: 730.0,
            containers_per_host: 8.0,
            targets: ProjectionTargets::default(),
        }
    }
}

impl ProjectionConstants {
    /// Check that every constant is finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Configuration`] naming the first bad constant.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("series_per_host", self.series_per_host),
            ("days_per_month", self.days_per_month),
            ("hours_per_month", self.hours_per_month),
            ("containers_per_host", self.containers_per_host),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PricingError::Configuration(format!(
                    "projection constant {name} must be finite and >= 0, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Infrastructure share of a projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InfrastructureProjection {
    /// Series from host metrics.
    pub series: f64,
    /// Monthly host logs in GB.
    pub logs_gb: f64,
    /// Monthly host-hours.
    pub host_hours: f64,
}

/// Application share of a projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ApplicationProjection {
    /// Series from application instances.
    pub series: f64,
    /// Monthly application logs in GB.
    pub logs_gb: f64,
    /// Monthly traces in GB.
    pub traces_gb: f64,
}

/// Usage derived from an [`EstimatorShape`], rounded to whole units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectedUsage {
    /// Infrastructure breakdown.
    pub infrastructure: InfrastructureProjection,
    /// Application breakdown.
    pub application: ApplicationProjection,
    /// Combined active series.
    pub series: f64,
    /// Combined monthly logs in GB.
    pub logs_gb: f64,
    /// Monthly traces in GB.
    pub traces_gb: f64,
    /// Infrastructure host-hours.
    pub host_hours: f64,
    /// Derived container-hours.
    pub container_hours: f64,
    /// Application host-hours (applications share the infrastructure hosts).
    pub app_host_hours: f64,
}

impl ProjectedUsage {
    /// Key the projected values by their target dimensions.
    #[must_use]
    pub fn to_usage(&self, targets: &ProjectionTargets) -> UsageQuantities {
        UsageQuantities::new()
            .with(targets.series.clone(), self.series)
            .with(targets.logs.clone(), self.logs_gb)
            .with(targets.traces.clone(), self.traces_gb)
            .with(targets.host_hours.clone(), self.host_hours)
            .with(targets.container_hours.clone(), self.container_hours)
            .with(targets.app_host_hours.clone(), self.app_host_hours)
    }
}

/// Project monthly usage from a shape.
///
/// The shape is sanitized first, so negative or non-finite parameters count
/// as zero.
#[must_use]
pub fn project_from_shape(
    shape: &EstimatorShape,
    constants: &ProjectionConstants,
) -> ProjectedUsage {
    let shape = shape.sanitized();
    let days = constants.days_per_month;

    let infra_series = shape.host_count * constants.series_per_host;
    let infra_logs = shape.host_count * shape.avg_daily_logs_per_host_gb * days;
    let host_hours = shape.host_count * constants.hours_per_month;

    let app_series = shape.app_instance_count * shape.avg_series_per_app_instance;
    let app_logs = shape.app_instance_count * shape.avg_daily_logs_per_app_instance_gb * days;
    let app_traces = shape.app_instance_count * shape.avg_daily_traces_per_app_instance_gb * days;

    ProjectedUsage {
        infrastructure: InfrastructureProjection {
            series: infra_series.round(),
            logs_gb: infra_logs.round(),
            host_hours: host_hours.round(),
        },
        application: ApplicationProjection {
            series: app_series.round(),
            logs_gb: app_logs.round(),
            traces_gb: app_traces.round(),
        },
        series: (infra_series + app_series).round(),
        logs_gb: (infra_logs + app_logs).round(),
        traces_gb: app_traces.round(),
        host_hours: host_hours.round(),
        container_hours: (host_hours * constants.containers_per_host).round(),
        app_host_hours: host_hours.round(),
    }
}

/// [`project_from_shape`] with the default constants.
#[must_use]
pub fn project_from_shape_default(shape: &EstimatorShape) -> ProjectedUsage {
    project_from_shape(shape, &ProjectionConstants::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_hosts() {
        let shape = EstimatorShape {
            host_count: 5.0,
            avg_daily_logs_per_host_gb: 0.2,
            ..EstimatorShape::empty()
        };
        let projected = project_from_shape_default(&shape);

        assert_eq!(projected.infrastructure.logs_gb, 30.0);
        assert_eq!(projected.infrastructure.host_hours, 3_650.0);
        assert_eq!(projected.infrastructure.series, 7_500.0);
        assert_eq!(projected.host_hours, 3_650.0);
        assert_eq!(projected.container_hours, 29_200.0);
        assert_eq!(projected.app_host_hours, 3_650.0);
        assert_eq!(projected.logs_gb, 30.0);
        assert_eq!(projected.traces_gb, 0.0);
    }

    #[test]
    fn typical_shape_combines_infra_and_app() {
        let projected = project_from_shape_default(&EstimatorShape::typical());

        // 5 * 1500 + 20 * 450
        assert_eq!(projected.series, 16_500.0);
        // 5 * 0.2 * 30 + 20 * 0.1 * 30
        assert_eq!(projected.logs_gb, 90.0);
        // 20 * 0.5 * 30
        assert_eq!(projected.traces_gb, 300.0);
        assert_eq!(projected.application.series, 9_000.0);
        assert_eq!(projected.application.logs_gb, 60.0);
    }

    #[test]
    fn outputs_round_to_whole_units() {
        let shape = EstimatorShape {
            app_instance_count: 3.0,
            avg_daily_traces_per_app_instance_gb: 0.33,
            avg_series_per_app_instance: 100.4,
            ..EstimatorShape::empty()
        };
        let projected = project_from_shape_default(&shape);

        // 3 * 0.33 * 30 = 29.7
        assert_eq!(projected.traces_gb, 30.0);
        // 3 * 100.4 = 301.2
        assert_eq!(projected.series, 301.0);
    }

    #[test]
    fn traces_do_not_affect_host_hours() {
        let base = EstimatorShape::typical();
        let more_traces = EstimatorShape {
            avg_daily_traces_per_app_instance_gb: 9.0,
            ..base
        };

        let a = project_from_shape_default(&base);
        let b = project_from_shape_default(&more_traces);

        assert_ne!(a.traces_gb, b.traces_gb);
        assert_eq!(a.host_hours, b.host_hours);
        assert_eq!(a.container_hours, b.container_hours);
        assert_eq!(a.app_host_hours, b.app_host_hours);
        assert_eq!(a.series, b.series);
        assert_eq!(a.logs_gb, b.logs_gb);
    }

    #[test]
    fn host_count_does_not_affect_traces() {
        let base = EstimatorShape::typical();
        let more_hosts = EstimatorShape {
            host_count: 50.0,
            ..base
        };

        let a = project_from_shape_default(&base);
        let b = project_from_shape_default(&more_hosts);

        assert_eq!(a.traces_gb, b.traces_gb);
        assert_eq!(a.application, b.application);
        assert_ne!(a.host_hours, b.host_hours);
    }

    #[test]
    fn projection_is_pure() {
        let shape = EstimatorShape::typical();
        assert_eq!(
            project_from_shape_default(&shape),
            project_from_shape_default(&shape)
        );
    }

    #[test]
    fn negative_shape_counts_as_zero() {
        let shape = EstimatorShape {
            host_count: -4.0,
            app_instance_count: f64::NAN,
            ..EstimatorShape::typical()
        };
        let projected = project_from_shape_default(&shape);

        assert_eq!(projected.series, 0.0);
        assert_eq!(projected.host_hours, 0.0);
        assert_eq!(projected.traces_gb, 0.0);
    }

    #[test]
    fn to_usage_uses_targets() {
        let projected = project_from_shape_default(&EstimatorShape::typical());
        let usage = projected.to_usage(&ProjectionTargets::default());

        assert_eq!(usage.len(), 6);
        assert_eq!(usage.get("metrics"), 16_500.0);
        assert_eq!(usage.get("logs"), 90.0);
        assert_eq!(usage.get("traces"), 300.0);
        assert_eq!(usage.get("k8sHostHours"), 3_650.0);
        assert_eq!(usage.get("k8sContainerHours"), 29_200.0);
        assert_eq!(usage.get("appHostHours"), 3_650.0);
        assert!(!usage.contains("users"));
    }

    #[test]
    fn shape_deserializes_with_defaults() {
        let shape: EstimatorShape = serde_json::from_str(r#"{"host_count": 3}"#).unwrap();
        assert_eq!(shape.host_count, 3.0);
        assert_eq!(shape.app_instance_count, 0.0);
    }

    #[test]
    fn constants_validate() {
        assert!(ProjectionConstants::default().validate().is_ok());
        let bad = ProjectionConstants {
            hours_per_month: f64::NAN,
            ..ProjectionConstants::default()
        };
        assert!(bad.validate().is_err());
    }
}
