// Copyright 2026 the vidgrid authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::{anyhow, Context, Result};
use sysinfo::{get_current_pid, ProcessesToUpdate, System};

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Process memory sampled at call time, in whole megabytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryMetrics {
    /// Resident set size.
    pub resident_mb: u64,
    /// Virtual size; stands in for a heap estimate.
    pub virtual_mb: u64,
}

/// Query the current process's memory use. Reflects state at call time only.
pub fn sample_memory() -> Result<MemoryMetrics> {
    let pid = get_current_pid().map_err(|e| anyhow!("cannot resolve current pid: {e}"))?;
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
    let process = system
        .process(pid)
        .context("current process not visible to sysinfo")?;
    Ok(MemoryMetrics {
        resident_mb: process.memory() / BYTES_PER_MB,
        virtual_mb: process.virtual_memory() / BYTES_PER_MB,
    })
}

/// Resident set size in MB, as an independent query.
pub fn resident_mb() -> Result<u64> {
    Ok(sample_memory()?.resident_mb)
}

/// Virtual size in MB, as an independent query.
pub fn virtual_mb() -> Result<u64> {
    Ok(sample_memory()?.virtual_mb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_reports_nonzero_resident_memory() {
        let metrics = sample_memory().unwrap();
        assert!(metrics.resident_mb > 0);
        assert!(metrics.virtual_mb >= metrics.resident_mb);
    }

    #[test]
    fn independent_queries_answer_on_their_own() {
        assert!(resident_mb().unwrap() > 0);
        assert!(virtual_mb().unwrap() > 0);
    }
}
