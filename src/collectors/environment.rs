//! Environment Metrics Collector
//!
//! Collects fan, power supply and temperature sensor status.
//!
//! # Metrics Produced
//! - `net_node_fan_up` - Labels: node, fan
//! - `net_node_ps_up`, `net_node_ps_pwr_{input,output,capacity}` - Labels: node, power_supply
//! - `net_node_sensor_up`, `net_node_sensor_temperature*` - Labels: node, sensor
//!
//! Power supplies are named `"<model> <id>"`, sensors `"<name> <module>"`.

use super::{collect_with_handler, status_ok, Category, CategoryReport, CollectionContext};
use crate::metrics::*;

/// Collects environmental metrics from a device
///
/// Queries fans, power supplies and temperature sensors and maps their status
/// strings to up (1) or down (0).
///
/// # Arguments
///
/// * `ctx` - Collection context holding the device client and node identity
///
/// # Returns
///
/// * `CategoryReport` with `CollectionStatus::Success` and the environment metrics
/// * `CategoryReport` with `CollectionStatus::Failed` and no metrics when the query fails
pub async fn collect_environment_metrics(ctx: &CollectionContext) -> CategoryReport {
    collect_with_handler(
        Category::Environment,
        ctx.client.environment(),
        |envt, out| {
            for fan in &envt.fans {
                out.push(Metric::new(
                    &FAN_UP,
                    status_ok(&fan.status),
                    vec![ctx.node.clone(), fan.name.clone()],
                ));
            }

            for ps in &envt.power_supplies {
                let labels = vec![ctx.node.clone(), format!("{} {}", ps.model, ps.id)];
                for (desc, value) in [
                    (&PS_UP, status_ok(&ps.status)),
                    (&PS_POWER_INPUT, ps.power_input),
                    (&PS_POWER_OUTPUT, ps.power_output),
                    (&PS_POWER_CAPACITY, ps.power_capacity),
                ] {
                    out.push(Metric::new(desc, value, labels.clone()));
                }
            }

            for sensor in &envt.sensors {
                let labels = vec![
                    ctx.node.clone(),
                    format!("{} {}", sensor.name, sensor.module),
                ];
                for (desc, value) in [
                    (&SENSOR_UP, status_ok(&sensor.status)),
                    (&SENSOR_TEMPERATURE, sensor.temperature),
                    (&SENSOR_THRESHOLD_HIGH, sensor.threshold_high),
                    (&SENSOR_THRESHOLD_LOW, sensor.threshold_low),
                ] {
                    out.push(Metric::new(desc, value, labels.clone()));
                }
            }
        },
    )
    .await
}
