//! Logged-in session counting from the utmp login records database.

use std::fs;
use std::path::Path;

use super::SourceError;

pub const UTMP_PATH: &str = "/var/run/utmp";

/// `sizeof(struct utmp)` for glibc on Linux
const RECORD_SIZE: usize = 384;

/// `ut_type` value of a normal user session
const USER_PROCESS: i16 = 7;

/// Count `USER_PROCESS` records in the utmp file at `path`.
pub fn read_user_count<P: AsRef<Path>>(path: P) -> Result<usize, SourceError> {
    let data = fs::read(path)?;
    Ok(count_user_processes(&data))
}

/// Count `USER_PROCESS` records in a raw utmp buffer. A trailing partial record is ignored.
pub fn count_user_processes(data: &[u8]) -> usize {
    data.chunks_exact(RECORD_SIZE)
        .filter(|record| i16::from_ne_bytes([record[0], record[1]]) == USER_PROCESS)
        .count()
}
