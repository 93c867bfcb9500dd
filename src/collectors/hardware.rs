use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sysinfo::{CpuExt, System, SystemExt};

/// Opaque hardware inventory included verbatim in the manifest.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct HardwareReport {
    pub cpu: Vec<Value>,
    pub gpu: Vec<Value>,
    pub ram: Vec<Value>,
    pub os: Value,
    pub display: Vec<Value>,
}

/// Narrow hardware-probe seam: one capability, one opaque result. Other
/// platforms slot in behind the same trait without the pipeline noticing.
pub trait HardwareProbe {
    fn report(&self) -> HardwareReport;
}

/// Portable probe backed by `sysinfo`.
///
/// Fills the cpu, ram and os sections. Gpu and display enumeration has no
/// portable source; those sections stay empty on this probe.
pub struct SystemProbe;

impl HardwareProbe for SystemProbe {
    fn report(&self) -> HardwareReport {
        let mut system = System::new_all();
        system.refresh_all();

        let report = HardwareReport {
            cpu: cpu_section(&system),
            gpu: Vec::new(),
            ram: ram_section(&system),
            os: os_section(&system),
            display: Vec::new(),
        };
        info!("Collected hardware report");
        report
    }
}

fn cpu_section(system: &System) -> Vec<Value> {
    let Some(first) = system.cpus().first() else {
        return Vec::new();
    };
    vec![json!({
        "name": first.brand(),
        "cores": system.physical_core_count(),
        "logical_processors": system.cpus().len(),
        "max_clock_mhz": first.frequency(),
        "manufacturer": first.vendor_id(),
    })]
}

fn ram_section(system: &System) -> Vec<Value> {
    vec![json!({
        "capacity_bytes": system.total_memory(),
        "available_bytes": system.available_memory(),
    })]
}

fn os_section(system: &System) -> Value {
    json!({
        "name": system.name(),
        "version": system.os_version(),
        "build_number": system.kernel_version(),
        "architecture": std::env::consts::ARCH,
    })
}
