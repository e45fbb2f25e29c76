//! @ai:module:intent Describe the benchmarking host for report headers
//! @ai:module:layer infrastructure
//! @ai:module:public_api SystemInfo
//! @ai:module:stateless true

const UNKNOWN: &str = "unknown";
const CPUINFO: &str = "/proc/cpuinfo";
const MEMINFO: &str = "/proc/meminfo";
const MAX_FREQ: &str = "/sys/devices/system/cpu/cpu0/cpufreq/cpuinfo_max_freq";

/// @ai:intent Host description shown in text and XML reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInfo {
    pub os: String,
    pub cpu_model: String,
    pub cores: String,
    pub frequency: String,
    pub ram: String,
}

impl SystemInfo {
    /// @ai:intent Gather host information; unreadable sources become "unknown"
    /// @ai:effects fs:read, syscall:uname
    pub fn collect() -> Self {
        let cpuinfo = std::fs::read_to_string(CPUINFO).unwrap_or_default();
        let meminfo = std::fs::read_to_string(MEMINFO).unwrap_or_default();

        let mut frequency = cpuinfo_value(&cpuinfo, "cpu MHz")
            .map(|mhz| format_mhz(&mhz))
            .unwrap_or_else(|| UNKNOWN.to_string());

        if let Some(max) = std::fs::read_to_string(MAX_FREQ)
            .ok()
            .and_then(|khz| max_frequency(&khz))
        {
            frequency = max;
        }

        Self {
            os: os_description(),
            cpu_model: cpuinfo_value(&cpuinfo, "model name").unwrap_or_else(|| UNKNOWN.to_string()),
            cores: cpuinfo_value(&cpuinfo, "cpu cores").unwrap_or_else(|| UNKNOWN.to_string()),
            frequency,
            ram: meminfo_value(&meminfo, "MemTotal").unwrap_or_else(|| UNKNOWN.to_string()),
        }
    }
}

/// @ai:intent Value of the first `key : value` line of /proc/cpuinfo
/// @ai:effects pure
fn cpuinfo_value(content: &str, key: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        (name.trim() == key).then(|| value.trim().to_string())
    })
}

/// @ai:intent Value of a `Key: value` line of /proc/meminfo, unit included
/// @ai:effects pure
fn meminfo_value(content: &str, key: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let (name, value) = line.split_once(": ")?;
        (name.trim() == key).then(|| value.trim().to_string())
    })
}

fn format_mhz(mhz: &str) -> String {
    let whole = mhz.split('.').next().unwrap_or(mhz).trim();
    format!("{whole} MHz")
}

/// @ai:intent Convert a cpufreq kHz reading to whole MHz
/// @ai:effects pure
fn max_frequency(khz: &str) -> Option<String> {
    let khz: u64 = khz.trim().parse().ok()?;
    Some(format!("{} MHz", khz / 1000))
}

#[cfg(unix)]
fn os_description() -> String {
    // SAFETY: utsname is plain data; uname fills every field with a NUL-terminated string.
    let mut uts: libc::utsname = unsafe { std::mem::zeroed() };

    if unsafe { libc::uname(&mut uts) } != 0 {
        return UNKNOWN.to_string();
    }

    let field = |raw: &[libc::c_char]| {
        let bytes: Vec<u8> = raw
            .iter()
            .take_while(|c| **c != 0)
            .map(|c| *c as u8)
            .collect();
        String::from_utf8_lossy(&bytes).into_owned()
    };

    format!(
        "{} {} {}",
        field(&uts.sysname[..]),
        field(&uts.release[..]),
        field(&uts.machine[..])
    )
}

#[cfg(not(unix))]
fn os_description() -> String {
    format!("{} {}", std::env::consts::OS, std::env::consts::ARCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CPUINFO_SAMPLE: &str = "processor\t: 0\n\
vendor_id\t: GenuineIntel\n\
model name\t: Intel(R) Xeon(R) CPU E5-2650 v2 @ 2.60GHz\n\
cpu MHz\t\t: 1200.000\n\
cpu cores\t: 8\n\
\n\
processor\t: 1\n\
model name\t: Intel(R) Xeon(R) CPU E5-2650 v2 @ 2.60GHz\n";

    #[test]
    fn test_cpuinfo_fields() {
        assert_eq!(
            cpuinfo_value(CPUINFO_SAMPLE, "model name").as_deref(),
            Some("Intel(R) Xeon(R) CPU E5-2650 v2 @ 2.60GHz")
        );
        assert_eq!(cpuinfo_value(CPUINFO_SAMPLE, "cpu cores").as_deref(), Some("8"));
        assert_eq!(
            cpuinfo_value(CPUINFO_SAMPLE, "cpu MHz").map(|v| format_mhz(&v)),
            Some("1200 MHz".to_string())
        );
        assert_eq!(cpuinfo_value(CPUINFO_SAMPLE, "flags"), None);
    }

    #[test]
    fn test_meminfo_total() {
        let sample = "MemTotal:       16367756 kB\nMemFree:         1234 kB\n";
        assert_eq!(meminfo_value(sample, "MemTotal").as_deref(), Some("16367756 kB"));
        assert_eq!(meminfo_value(sample, "SwapTotal"), None);
    }

    #[test]
    fn test_max_frequency_from_khz() {
        assert_eq!(max_frequency("2601000\n").as_deref(), Some("2601 MHz"));
        assert_eq!(max_frequency("garbage"), None);
    }

    #[test]
    fn test_collect_never_leaves_fields_empty() {
        let info = SystemInfo::collect();
        assert!(!info.os.is_empty());
        assert!(!info.ram.is_empty());
    }
}
