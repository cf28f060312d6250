/// Database layer for NoteVault
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with a startup health check
/// - `migrations`: Embedded schema migrations
///
/// SQL for each record type lives next to the type in `models`.

pub mod migrations;
pub mod pool;
