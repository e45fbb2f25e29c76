//! @ai:module:intent Resource limits applied to tool child processes
//! @ai:module:layer infrastructure
//! @ai:module:public_api ResourceLimits, LimitKind, LimitPair, children_cpu_time
//! @ai:module:stateless true

use std::collections::BTreeMap;
use std::time::Duration;

/// @ai:intent Kind of kernel resource limit a benchmark may set
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LimitKind {
    /// Seconds of CPU time
    CpuTime,
    /// Bytes of virtual address space
    AddressSpace,
}

/// @ai:intent Soft and hard value of one limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitPair {
    pub soft: u64,
    pub hard: u64,
}

impl LimitPair {
    /// @ai:intent Limit whose soft and hard values coincide
    /// @ai:effects pure
    pub fn both(value: u64) -> Self {
        Self {
            soft: value,
            hard: value,
        }
    }
}

/// @ai:intent Set of limits keyed by kind, applied together before the tool starts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceLimits {
    limits: BTreeMap<LimitKind, LimitPair>,
}

impl ResourceLimits {
    /// @ai:intent Build limits from definition values (memory in MiB, time in seconds)
    /// @ai:effects pure
    pub fn from_definition(memlimit_mib: Option<u64>, timelimit_secs: Option<u64>) -> Self {
        let mut limits = Self::default();

        if let Some(mib) = memlimit_mib {
            let bytes = mib.saturating_mul(1024 * 1024);
            limits.set(LimitKind::AddressSpace, LimitPair::both(bytes));
        }

        if let Some(secs) = timelimit_secs {
            limits.set(LimitKind::CpuTime, LimitPair::both(secs));
        }

        limits
    }

    pub fn set(&mut self, kind: LimitKind, pair: LimitPair) {
        self.limits.insert(kind, pair);
    }

    pub fn get(&self, kind: LimitKind) -> Option<LimitPair> {
        self.limits.get(&kind).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }

    /// @ai:intent Hard CPU limit in seconds, if one is set
    pub fn cpu_seconds(&self) -> Option<u64> {
        self.get(LimitKind::CpuTime).map(|pair| pair.hard)
    }

    /// @ai:intent Address-space limit in whole MiB, for report headers
    pub fn memory_mib(&self) -> Option<u64> {
        self.get(LimitKind::AddressSpace)
            .map(|pair| pair.hard / (1024 * 1024))
    }

    /// @ai:intent Apply every limit to the calling process
    /// @ai:pre called in the forked child before exec; async-signal-safe calls only
    /// @ai:effects process:rlimit
    #[cfg(unix)]
    pub fn apply(&self) -> std::io::Result<()> {
        for (kind, pair) in &self.limits {
            let resource = match kind {
                LimitKind::CpuTime => libc::RLIMIT_CPU,
                LimitKind::AddressSpace => libc::RLIMIT_AS,
            };

            let rlim = libc::rlimit {
                rlim_cur: pair.soft as libc::rlim_t,
                rlim_max: pair.hard as libc::rlim_t,
            };

            // SAFETY: setrlimit only reads the struct we pass.
            if unsafe { libc::setrlimit(resource, &rlim) } != 0 {
                return Err(std::io::Error::last_os_error());
            }
        }

        Ok(())
    }
}

/// @ai:intent Total user+system CPU time consumed by waited-for children so far
/// @ai:post monotonically non-decreasing; callers subtract two snapshots
/// @ai:effects process:rusage
#[cfg(unix)]
pub fn children_cpu_time() -> Duration {
    // SAFETY: rusage is plain data; a zeroed value is valid and getrusage fills it in.
    let mut usage: libc::rusage = unsafe { std::mem::zeroed() };

    if unsafe { libc::getrusage(libc::RUSAGE_CHILDREN, &mut usage) } != 0 {
        tracing::debug!(
            "getrusage failed: {}",
            std::io::Error::last_os_error()
        );
        return Duration::ZERO;
    }

    timeval(usage.ru_utime) + timeval(usage.ru_stime)
}

#[cfg(not(unix))]
pub fn children_cpu_time() -> Duration {
    Duration::ZERO
}

#[cfg(unix)]
fn timeval(tv: libc::timeval) -> Duration {
    Duration::from_secs(tv.tv_sec.max(0) as u64) + Duration::from_micros(tv.tv_usec.max(0) as u64)
}
