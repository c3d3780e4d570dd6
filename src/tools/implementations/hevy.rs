// ABOUTME: Hevy tool adapters: workout history, routines, routine creation, workout logging
// ABOUTME: Each adapter forwards to the HevyClient and stringifies the outcome

//! Hevy tool adapters

use crate::constants::defaults;
use crate::providers::HevyClient;
use crate::tools::traits::AgentTool;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info};

fn default_workouts_page_size() -> u32 {
    defaults::HEVY_WORKOUTS_PAGE_SIZE
}

fn default_routines_page_size() -> u32 {
    defaults::HEVY_ROUTINES_PAGE_SIZE
}

fn default_page() -> u32 {
    1
}

/// `hevy_get_workouts` arguments
#[derive(Debug, Deserialize)]
struct GetWorkoutsArgs {
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_workouts_page_size")]
    page_size: u32,
    start_date: Option<String>,
    end_date: Option<String>,
}

/// `hevy_get_routines` arguments
#[derive(Debug, Deserialize)]
struct GetRoutinesArgs {
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_routines_page_size")]
    page_size: u32,
}

/// `hevy_get_workout_details` arguments
#[derive(Debug, Deserialize)]
struct WorkoutDetailsArgs {
    workout_id: String,
}

/// `hevy_get_routine_details` arguments
#[derive(Debug, Deserialize)]
struct RoutineDetailsArgs {
    routine_id: String,
}

/// `hevy_create_routine` arguments
#[derive(Debug, Deserialize)]
struct CreateRoutineArgs {
    title: String,
    exercises: Value,
    folder_id: Option<String>,
}

/// `hevy_log_workout` arguments
#[derive(Debug, Deserialize)]
struct LogWorkoutArgs {
    title: String,
    start_time: String,
    end_time: String,
    exercises: Value,
    description: Option<String>,
}

/// `hevy_get_workouts`
pub struct GetWorkoutsTool {
    client: Arc<HevyClient>,
}

#[async_trait]
impl AgentTool for GetWorkoutsTool {
    fn name(&self) -> &'static str {
        "hevy_get_workouts"
    }

    fn description(&self) -> &'static str {
        "Fetch workout history from Hevy to see what exercises the user has completed, \
         including sets, reps, and weights."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "page": {
                    "type": "integer",
                    "description": "Page number for pagination (default: 1).",
                    "default": 1,
                },
                "page_size": {
                    "type": "integer",
                    "description": "Number of workouts per page (default: 10).",
                    "default": 10,
                },
                "start_date": {
                    "type": "string",
                    "description": "Start date in YYYY-MM-DD format to filter workouts.",
                },
                "end_date": {
                    "type": "string",
                    "description": "End date in YYYY-MM-DD format to filter workouts.",
                },
            },
            "additionalProperties": false,
        })
    }

    async fn execute(&self, args: Value) -> String {
        let args: GetWorkoutsArgs = match serde_json::from_value(args) {
            Ok(args) => args,
            Err(e) => return format!("Error fetching workouts: {e}"),
        };
        match self
            .client
            .get_workouts(
                args.page,
                args.page_size,
                args.start_date.as_deref(),
                args.end_date.as_deref(),
            )
            .await
        {
            Ok(data) => {
                info!(
                    "Retrieved Hevy workouts (page {}, size {})",
                    args.page, args.page_size
                );
                data.to_string()
            }
            Err(e) => {
                error!("Failed to get Hevy workouts: {e}");
                format!("Error fetching workouts: {e}")
            }
        }
    }
}

/// `hevy_get_workout_details`
pub struct GetWorkoutDetailsTool {
    client: Arc<HevyClient>,
}

#[async_trait]
impl AgentTool for GetWorkoutDetailsTool {
    fn name(&self) -> &'static str {
        "hevy_get_workout_details"
    }

    fn description(&self) -> &'static str {
        "Fetch detailed information for a specific workout including all exercises, sets, \
         reps, weights, and notes."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "workout_id": {
                    "type": "string",
                    "description": "Unique identifier for the workout.",
                },
            },
            "required": ["workout_id"],
            "additionalProperties": false,
        })
    }

    async fn execute(&self, args: Value) -> String {
        let args: WorkoutDetailsArgs = match serde_json::from_value(args) {
            Ok(args) => args,
            Err(e) => return format!("Error fetching workout details: {e}"),
        };
        match self.client.get_workout_details(&args.workout_id).await {
            Ok(data) => {
                info!("Retrieved Hevy workout details for {}", args.workout_id);
                data.to_string()
            }
            Err(e) => {
                error!("Failed to get Hevy workout details: {e}");
                format!("Error fetching workout details: {e}")
            }
        }
    }
}

/// `hevy_get_routines`
pub struct GetRoutinesTool {
    client: Arc<HevyClient>,
}

#[async_trait]
impl AgentTool for GetRoutinesTool {
    fn name(&self) -> &'static str {
        "hevy_get_routines"
    }

    fn description(&self) -> &'static str {
        "Fetch all saved workout routines from Hevy to see planned workouts and templates."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "page": {
                    "type": "integer",
                    "description": "Page number for pagination (default: 1).",
                    "default": 1,
                },
                "page_size": {
                    "type": "integer",
                    "description": "Number of routines per page (default: 50).",
                    "default": 50,
                },
            },
            "additionalProperties": false,
        })
    }

    async fn execute(&self, args: Value) -> String {
        let args: GetRoutinesArgs = match serde_json::from_value(args) {
            Ok(args) => args,
            Err(e) => return format!("Error fetching routines: {e}"),
        };
        match self.client.get_routines(args.page, args.page_size).await {
            Ok(data) => {
                info!(
                    "Retrieved Hevy routines (page {}, size {})",
                    args.page, args.page_size
                );
                data.to_string()
            }
            Err(e) => {
                error!("Failed to get Hevy routines: {e}");
                format!("Error fetching routines: {e}")
            }
        }
    }
}

/// `hevy_get_routine_details`
pub struct GetRoutineDetailsTool {
    client: Arc<HevyClient>,
}

#[async_trait]
impl AgentTool for GetRoutineDetailsTool {
    fn name(&self) -> &'static str {
        "hevy_get_routine_details"
    }

    fn description(&self) -> &'static str {
        "Fetch detailed information for a specific workout routine including all planned \
         exercises and structure."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "routine_id": {
                    "type": "string",
                    "description": "Unique identifier for the routine.",
                },
            },
            "required": ["routine_id"],
            "additionalProperties": false,
        })
    }

    async fn execute(&self, args: Value) -> String {
        let args: RoutineDetailsArgs = match serde_json::from_value(args) {
            Ok(args) => args,
            Err(e) => return format!("Error fetching routine details: {e}"),
        };
        match self.client.get_routine_details(&args.routine_id).await {
            Ok(data) => {
                info!("Retrieved Hevy routine details for {}", args.routine_id);
                data.to_string()
            }
            Err(e) => {
                error!("Failed to get Hevy routine details: {e}");
                format!("Error fetching routine details: {e}")
            }
        }
    }
}

/// `hevy_create_routine`
pub struct CreateRoutineTool {
    client: Arc<HevyClient>,
}

#[async_trait]
impl AgentTool for CreateRoutineTool {
    fn name(&self) -> &'static str {
        "hevy_create_routine"
    }

    fn description(&self) -> &'static str {
        "Create a new workout routine in Hevy with specified exercises, sets, and reps. \
         Use this to design workout plans for the user."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "Name/title of the workout routine (e.g., 'Upper Body Strength').",
                },
                "exercises": {
                    "type": "array",
                    "description": "List of exercises in the routine. Each exercise needs exercise_template_id and sets array.",
                    "items": {
                        "type": "object",
                        "properties": {
                            "exercise_template_id": {
                                "type": "string",
                                "description": "Hevy exercise template identifier.",
                            },
                            "superset_id": {
                                "type": "integer",
                                "description": "Optional superset grouping ID for exercises performed together.",
                            },
                            "rest_seconds": {
                                "type": "integer",
                                "description": "Rest time between sets in seconds.",
                            },
                            "sets": {
                                "type": "array",
                                "description": "Array of sets for this exercise.",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "type": {
                                            "type": "string",
                                            "description": "Set type: 'normal', 'warmup', 'dropset', or 'failure'.",
                                            "enum": ["normal", "warmup", "dropset", "failure"],
                                        },
                                        "weight_kg": {
                                            "type": "number",
                                            "description": "Target weight in kilograms.",
                                        },
                                        "reps": {
                                            "type": "integer",
                                            "description": "Target number of reps.",
                                        },
                                        "distance_meters": {
                                            "type": "number",
                                            "description": "Distance in meters (for cardio exercises).",
                                        },
                                        "duration_seconds": {
                                            "type": "integer",
                                            "description": "Duration in seconds (for timed exercises).",
                                        },
                                    },
                                    "required": ["type"],
                                },
                            },
                        },
                        "required": ["exercise_template_id", "sets"],
                    },
                },
                "folder_id": {
                    "type": "string",
                    "description": "Optional folder ID to organize this routine.",
                },
            },
            "required": ["title", "exercises"],
            "additionalProperties": false,
        })
    }

    async fn execute(&self, args: Value) -> String {
        let args: CreateRoutineArgs = match serde_json::from_value(args) {
            Ok(args) => args,
            Err(e) => return format!("Error creating routine: {e}"),
        };
        match self
            .client
            .create_routine(&args.title, args.exercises, args.folder_id.as_deref())
            .await
        {
            Ok(data) => {
                info!("Created Hevy routine: {}", args.title);
                data.to_string()
            }
            Err(e) => {
                error!("Failed to create Hevy routine: {e}");
                format!("Error creating routine: {e}")
            }
        }
    }
}

/// `hevy_log_workout`
pub struct LogWorkoutTool {
    client: Arc<HevyClient>,
}

#[async_trait]
impl AgentTool for LogWorkoutTool {
    fn name(&self) -> &'static str {
        "hevy_log_workout"
    }

    fn description(&self) -> &'static str {
        "Log a completed workout in Hevy with exercises, sets, reps, and weights. Use this \
         to track the user's training progress."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "Workout title (e.g., 'Morning Chest Day').",
                },
                "description": {
                    "type": "string",
                    "description": "Optional workout description or notes.",
                },
                "start_time": {
                    "type": "string",
                    "description": "ISO format datetime when workout started.",
                },
                "end_time": {
                    "type": "string",
                    "description": "ISO format datetime when workout ended.",
                },
                "exercises": {
                    "type": "array",
                    "description": "List of exercises performed.",
                    "items": {
                        "type": "object",
                        "properties": {
                            "exercise_id": {
                                "type": "string",
                                "description": "Hevy exercise identifier.",
                            },
                            "sets": {
                                "type": "array",
                                "description": "List of sets performed.",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "reps": {"type": "integer"},
                                        "weight_kg": {"type": "number"},
                                    },
                                    "required": ["reps", "weight_kg"],
                                },
                            },
                        },
                        "required": ["exercise_id", "sets"],
                    },
                },
            },
            "required": ["title", "start_time", "end_time", "exercises"],
            "additionalProperties": false,
        })
    }

    async fn execute(&self, args: Value) -> String {
        let args: LogWorkoutArgs = match serde_json::from_value(args) {
            Ok(args) => args,
            Err(e) => return format!("Error logging workout: {e}"),
        };
        let mut workout = json!({
            "title": args.title,
            "start_time": args.start_time,
            "end_time": args.end_time,
            "exercises": args.exercises,
        });
        if let Some(description) = args.description {
            workout["description"] = Value::String(description);
        }
        match self.client.log_workout(&workout).await {
            Ok(data) => {
                info!("Logged Hevy workout");
                data.to_string()
            }
            Err(e) => {
                error!("Failed to log Hevy workout: {e}");
                format!("Error logging workout: {e}")
            }
        }
    }
}

/// Every Hevy tool over the given client
#[must_use]
pub fn tools(client: Arc<HevyClient>) -> Vec<Box<dyn AgentTool>> {
    vec![
        Box::new(GetWorkoutsTool {
            client: Arc::clone(&client),
        }),
        Box::new(GetWorkoutDetailsTool {
            client: Arc::clone(&client),
        }),
        Box::new(GetRoutinesTool {
            client: Arc::clone(&client),
        }),
        Box::new(GetRoutineDetailsTool {
            client: Arc::clone(&client),
        }),
        Box::new(CreateRoutineTool {
            client: Arc::clone(&client),
        }),
        Box::new(LogWorkoutTool { client }),
    ]
}
