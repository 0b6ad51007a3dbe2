/// Business services for Stockroom
///
/// Services sit between the HTTP adapter and the models: they resolve actors,
/// apply the authorization policy, stamp timestamps, and translate missing
/// rows into typed failures. Handlers stay thin; models stay dumb.
///
/// # Modules
///
/// - `tasks`: Task lifecycle (create/update/delete), overdue lists, statistics
/// - `accounts`: Login, registration, and the user admin surface

pub mod accounts;
pub mod tasks;
