// ABOUTME: WHOOP tool adapters: recovery, sleep, strain, workouts, and cycles
// ABOUTME: Each adapter forwards to the WhoopClient and stringifies the outcome

//! WHOOP tool adapters

use crate::errors::AppResult;
use crate::providers::{DateRange, WhoopClient};
use crate::tools::traits::AgentTool;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info};

/// Date-range arguments shared by every WHOOP tool
#[derive(Debug, Default, Deserialize)]
struct RangeArgs {
    start_date: Option<String>,
    end_date: Option<String>,
}

impl RangeArgs {
    fn parse(args: &Value) -> Self {
        serde_json::from_value(args.clone()).unwrap_or_default()
    }

    fn range(self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }
}

fn range_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "start_date": {
                "type": "string",
                "description": "Start date in YYYY-MM-DD format. Defaults to 7 days ago if not specified.",
            },
            "end_date": {
                "type": "string",
                "description": "End date in YYYY-MM-DD format. Defaults to today if not specified.",
            },
        },
        "additionalProperties": false,
    })
}

fn stringify(result: AppResult<Value>, what: &str) -> String {
    match result {
        Ok(data) => {
            info!("Retrieved Whoop {what} data");
            data.to_string()
        }
        Err(e) => {
            error!("Failed to get Whoop {what} data: {e}");
            format!("Error fetching {what} data: {e}")
        }
    }
}

/// `whoop_get_recovery`
pub struct GetRecoveryTool {
    client: Arc<WhoopClient>,
}

#[async_trait]
impl AgentTool for GetRecoveryTool {
    fn name(&self) -> &'static str {
        "whoop_get_recovery"
    }

    fn description(&self) -> &'static str {
        "Fetch recovery data from Whoop to understand the user's readiness for training. \
         Recovery scores indicate how well the body has recovered from previous strain."
    }

    fn input_schema(&self) -> Value {
        range_schema()
    }

    async fn execute(&self, args: Value) -> String {
        let range = RangeArgs::parse(&args).range();
        stringify(self.client.get_recovery(&range).await, "recovery")
    }
}

/// `whoop_get_sleep`
pub struct GetSleepTool {
    client: Arc<WhoopClient>,
}

#[async_trait]
impl AgentTool for GetSleepTool {
    fn name(&self) -> &'static str {
        "whoop_get_sleep"
    }

    fn description(&self) -> &'static str {
        "Fetch sleep data from Whoop including sleep duration, quality, stages, and disturbances."
    }

    fn input_schema(&self) -> Value {
        range_schema()
    }

    async fn execute(&self, args: Value) -> String {
        let range = RangeArgs::parse(&args).range();
        stringify(self.client.get_sleep(&range).await, "sleep")
    }
}

/// `whoop_get_strain`
pub struct GetStrainTool {
    client: Arc<WhoopClient>,
}

#[async_trait]
impl AgentTool for GetStrainTool {
    fn name(&self) -> &'static str {
        "whoop_get_strain"
    }

    fn description(&self) -> &'static str {
        "Fetch strain data from Whoop showing cardiovascular load and exertion levels \
         throughout the day."
    }

    fn input_schema(&self) -> Value {
        range_schema()
    }

    async fn execute(&self, args: Value) -> String {
        let range = RangeArgs::parse(&args).range();
        stringify(self.client.get_strain(&range).await, "strain")
    }
}

/// `whoop_get_workouts`
pub struct GetWorkoutsTool {
    client: Arc<WhoopClient>,
}

#[async_trait]
impl AgentTool for GetWorkoutsTool {
    fn name(&self) -> &'static str {
        "whoop_get_workouts"
    }

    fn description(&self) -> &'static str {
        "Fetch workout activity data from Whoop including workout type, duration, and \
         intensity metrics."
    }

    fn input_schema(&self) -> Value {
        range_schema()
    }

    async fn execute(&self, args: Value) -> String {
        let range = RangeArgs::parse(&args).range();
        stringify(self.client.get_workouts(&range).await, "workout")
    }
}

/// `whoop_get_cycles`
pub struct GetCyclesTool {
    client: Arc<WhoopClient>,
}

#[async_trait]
impl AgentTool for GetCyclesTool {
    fn name(&self) -> &'static str {
        "whoop_get_cycles"
    }

    fn description(&self) -> &'static str {
        "Fetch complete physiological cycle data from Whoop combining strain, recovery, \
         and sleep metrics."
    }

    fn input_schema(&self) -> Value {
        range_schema()
    }

    async fn execute(&self, args: Value) -> String {
        let range = RangeArgs::parse(&args).range();
        stringify(self.client.get_cycles(&range).await, "cycle")
    }
}

/// Every WHOOP tool over the given client
#[must_use]
pub fn tools(client: Arc<WhoopClient>) -> Vec<Box<dyn AgentTool>> {
    vec![
        Box::new(GetRecoveryTool {
            client: Arc::clone(&client),
        }),
        Box::new(GetSleepTool {
            client: Arc::clone(&client),
        }),
        Box::new(GetStrainTool {
            client: Arc::clone(&client),
        }),
        Box::new(GetWorkoutsTool {
            client: Arc::clone(&client),
        }),
        Box::new(GetCyclesTool { client }),
    ]
}
