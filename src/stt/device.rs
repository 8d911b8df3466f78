use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::config::ConfigError;

const NVIDIA_MARKERS: [&str; 3] = ["/dev/nvidia0", "/dev/nvidiactl", "/proc/driver/nvidia/version"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DevicePreference {
    Auto,
    Cpu,
    Gpu,
}

impl FromStr for DevicePreference {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(DevicePreference::Auto),
            "cpu" => Ok(DevicePreference::Cpu),
            "gpu" | "cuda" => Ok(DevicePreference::Gpu),
            _ => Err(ConfigError::InvalidDevice(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Cpu,
    Gpu,
}

impl Device {
    pub fn select(preference: DevicePreference) -> Self {
        Self::resolve(preference, gpu_available())
    }

    fn resolve(preference: DevicePreference, gpu_present: bool) -> Self {
        match preference {
            DevicePreference::Cpu => Device::Cpu,
            DevicePreference::Gpu => Device::Gpu,
            DevicePreference::Auto if gpu_present => Device::Gpu,
            DevicePreference::Auto => Device::Cpu,
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Gpu => write!(f, "gpu"),
        }
    }
}

fn gpu_available() -> bool {
    NVIDIA_MARKERS.iter().any(|marker| Path::new(marker).exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_preferences() {
        assert_eq!("auto".parse::<DevicePreference>().unwrap(), DevicePreference::Auto);
        assert_eq!(" CPU ".parse::<DevicePreference>().unwrap(), DevicePreference::Cpu);
        assert_eq!("cuda".parse::<DevicePreference>().unwrap(), DevicePreference::Gpu);
        assert!(matches!("tpu".parse::<DevicePreference>(), Err(ConfigError::InvalidDevice(_))));
    }

    #[test]
    fn auto_follows_detection() {
        assert_eq!(Device::resolve(DevicePreference::Auto, true), Device::Gpu);
        assert_eq!(Device::resolve(DevicePreference::Auto, false), Device::Cpu);
        assert_eq!(Device::resolve(DevicePreference::Cpu, true), Device::Cpu);
        assert_eq!(Device::resolve(DevicePreference::Gpu, false), Device::Gpu);
    }
}
