// Supervision constants (no magic values)

/// Fallback location for the captured stdout stream
pub const DEFAULT_STDOUT_PATH: &str = "stdout.txt";

/// Fallback location for the (inert) stderr file
pub const DEFAULT_STDERR_PATH: &str = "stderr.txt";

/// Printed to the console before anything is relayed
pub const START_BANNER: &str = "===== Starting child =====\n";

/// Printed to the console after the child has been reaped
pub const END_BANNER: &str = "===== Ending child =====\n";

/// Upper bound on bytes moved per relay iteration
pub const RELAY_CHUNK_SIZE: usize = 100;

/// Exit code reported when the program image could not be executed
pub const LAUNCH_FAILED_EXIT_CODE: i32 = 1;

/// Shells report "killed by signal N" as 128 + N
pub const SIGNAL_EXIT_CODE_BASE: i32 = 128;

/// strftime layout of the launch line timestamp (local time, 24h clock)
pub const LAUNCH_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
