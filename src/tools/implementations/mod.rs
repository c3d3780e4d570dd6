// ABOUTME: Tool adapter implementations grouped by provider
// ABOUTME: Hevy workout tools and WHOOP data tools

//! Tool implementations

/// Hevy workout and routine tools
pub mod hevy;
/// WHOOP recovery/sleep/strain tools
pub mod whoop;
