//! # IIO Humidity Sensor
//!
//! Reads a DHT11/DHT22 through the Linux Industrial I/O subsystem.
//!
//! The kernel `dht11` driver (enabled on a Raspberry Pi with
//! `dtoverlay=dht11,gpiopin=4`) does the bit-banging and exposes the sensor as
//! `/sys/bus/iio/devices/iio:deviceN`:
//!
//! - `name`: `dht11@<pin>`
//! - `in_humidityrelative_input`: relative humidity in milli-percent
//! - `in_temp_input`: temperature in milli-degrees Celsius
//!
//! A failed transfer (bad checksum, timing mismatch) surfaces as `EIO` on read.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{SensorKind, SensorReader};
use crate::error::{ReporterError, Result};

/// Attribute holding relative humidity (milli-percent)
const HUMIDITY_ATTR: &str = "in_humidityrelative_input";

/// Attribute holding temperature (milli-degrees Celsius)
const TEMPERATURE_ATTR: &str = "in_temp_input";

/// Prefix of IIO device directories
const DEVICE_PREFIX: &str = "iio:device";

/// DHT sensor exposed by the kernel `dht11` IIO driver
#[derive(Debug, Clone)]
pub struct IioHumiditySensor {
    device_dir: PathBuf,
}

impl IioHumiditySensor {
    /// Find the IIO device for a sensor wired to `pin`
    ///
    /// Scans `root/iio:device*/name` for `<driver>@<pin>`. A device named just
    /// `<driver>` is accepted when it is the only candidate.
    ///
    /// # Errors
    ///
    /// - `SensorNotFound`: no matching device under `root`
    /// - `Io`: `root` cannot be listed
    pub fn discover<P: AsRef<Path>>(root: P, kind: SensorKind, pin: u8) -> Result<Self> {
        let root = root.as_ref();
        let driver = kind.driver_name();
        let wanted = format!("{}@{}", driver, pin);

        let mut bare_matches = Vec::new();
        let mut entries: Vec<PathBuf> = fs::read_dir(root)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with(DEVICE_PREFIX))
            .map(|entry| entry.path())
            .collect();
        entries.sort();

        for dir in entries {
            let name = match fs::read_to_string(dir.join("name")) {
                Ok(name) => name.trim().to_string(),
                Err(e) => {
                    debug!("Skipping {}: {}", dir.display(), e);
                    continue;
                }
            };

            if name == wanted {
                info!("Found {:?} sensor on pin {} at {}", kind, pin, dir.display());
                return Ok(Self::at(dir));
            }
            if name == driver {
                bare_matches.push(dir);
            }
        }

        if bare_matches.len() == 1 {
            let dir = bare_matches.remove(0);
            info!("Found {:?} sensor at {}", kind, dir.display());
            return Ok(Self::at(dir));
        }

        Err(ReporterError::SensorNotFound(format!(
            "no IIO device named {} under {}",
            wanted,
            root.display()
        )))
    }

    /// Use a known IIO device directory
    pub fn at<P: Into<PathBuf>>(device_dir: P) -> Self {
        Self {
            device_dir: device_dir.into(),
        }
    }

    /// Device directory in sysfs
    pub fn device_dir(&self) -> &Path {
        &self.device_dir
    }

    /// Read a milli-unit attribute and scale it, NaN on any failure
    fn read_scaled(&self, attr: &str) -> f32 {
        let path = self.device_dir.join(attr);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("Read of {} failed: {}", path.display(), e);
                return f32::NAN;
            }
        };

        match raw.trim().parse::<i32>() {
            Ok(milli) => milli as f32 / 1000.0,
            Err(e) => {
                debug!("Unparseable value {:?} in {}: {}", raw.trim(), path.display(), e);
                f32::NAN
            }
        }
    }
}

impl SensorReader for IioHumiditySensor {
    fn read_humidity(&mut self) -> f32 {
        self.read_scaled(HUMIDITY_ATTR)
    }

    fn read_temperature(&mut self) -> f32 {
        self.read_scaled(TEMPERATURE_ATTR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fake_device(root: &Path, index: usize, name: &str) -> PathBuf {
        let dir = root.join(format!("iio:device{}", index));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("name"), format!("{}\n", name)).unwrap();
        dir
    }

    #[test]
    fn test_discover_by_pin() {
        let root = TempDir::new().unwrap();
        fake_device(root.path(), 0, "dht11@17");
        let wanted = fake_device(root.path(), 1, "dht11@4");

        let sensor = IioHumiditySensor::discover(root.path(), SensorKind::Dht11, 4).unwrap();
        assert_eq!(sensor.device_dir(), wanted.as_path());
    }

    #[test]
    fn test_discover_single_bare_name() {
        let root = TempDir::new().unwrap();
        fake_device(root.path(), 0, "mcp3008");
        let wanted = fake_device(root.path(), 1, "dht11");

        let sensor = IioHumiditySensor::discover(root.path(), SensorKind::Dht22, 4).unwrap();
        assert_eq!(sensor.device_dir(), wanted.as_path());
    }

    #[test]
    fn test_discover_ambiguous_bare_names_fails() {
        let root = TempDir::new().unwrap();
        fake_device(root.path(), 0, "dht11");
        fake_device(root.path(), 1, "dht11");

        let result = IioHumiditySensor::discover(root.path(), SensorKind::Dht11, 4);
        assert!(matches!(result, Err(ReporterError::SensorNotFound(_))));
    }

    #[test]
    fn test_discover_not_found() {
        let root = TempDir::new().unwrap();
        fake_device(root.path(), 0, "dht11@17");

        match IioHumiditySensor::discover(root.path(), SensorKind::Dht11, 4) {
            Err(ReporterError::SensorNotFound(msg)) => assert!(msg.contains("dht11@4")),
            other => panic!("Expected SensorNotFound, got: {:?}", other),
        }
    }

    #[test]
    fn test_discover_missing_root_is_io_error() {
        let root = TempDir::new().unwrap();
        let missing = root.path().join("nope");
        let result = IioHumiditySensor::discover(&missing, SensorKind::Dht11, 4);
        assert!(matches!(result, Err(ReporterError::Io(_))));
    }

    #[test]
    fn test_read_scales_milli_units() {
        let root = TempDir::new().unwrap();
        let dir = fake_device(root.path(), 0, "dht11@4");
        fs::write(dir.join(HUMIDITY_ATTR), "55000\n").unwrap();
        fs::write(dir.join(TEMPERATURE_ATTR), "-1500\n").unwrap();

        let mut sensor = IioHumiditySensor::at(&dir);
        assert_eq!(sensor.read_humidity(), 55.0);
        assert_eq!(sensor.read_temperature(), -1.5);
    }

    #[test]
    fn test_missing_attribute_reads_nan() {
        let root = TempDir::new().unwrap();
        let dir = fake_device(root.path(), 0, "dht11@4");
        fs::write(dir.join(HUMIDITY_ATTR), "40000\n").unwrap();

        let mut sensor = IioHumiditySensor::at(&dir);
        assert_eq!(sensor.read_humidity(), 40.0);
        assert!(sensor.read_temperature().is_nan());
    }

    #[test]
    fn test_garbage_attribute_reads_nan() {
        let root = TempDir::new().unwrap();
        let dir = fake_device(root.path(), 0, "dht11@4");
        fs::write(dir.join(HUMIDITY_ATTR), "n/a\n").unwrap();

        let mut sensor = IioHumiditySensor::at(&dir);
        assert!(sensor.read_humidity().is_nan());
    }
}
