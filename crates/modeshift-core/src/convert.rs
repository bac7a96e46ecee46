// ── API-to-domain type conversions ──
//
// Bridges raw `modeshift_api` device entries into `DeviceRecord`. Missing
// optional fields get sentinel defaults; only entries without a system IP
// are dropped, since nothing can target them.

use modeshift_api::RawDevice;

use crate::model::{ConfigMode, DeviceRecord, NO_TEMPLATE};

/// Normalize one inventory entry. `None` for placeholders without a system IP.
pub fn device_record(raw: RawDevice) -> Option<DeviceRecord> {
    let system_ip = raw.system_ip.filter(|ip| !ip.is_empty())?;

    Some(DeviceRecord {
        host_name: raw.host_name.unwrap_or_default(),
        system_ip,
        config_mode: ConfigMode::from_wire(raw.config_operation_mode.as_deref()),
        attached_template: raw.template.unwrap_or_else(|| NO_TEMPLATE.into()),
        connection_state: raw.connection_state.unwrap_or_default(),
        chassis_id: raw.chassis_number.unwrap_or_default(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw(system_ip: Option<&str>) -> RawDevice {
        RawDevice {
            host_name: Some("r1".into()),
            system_ip: system_ip.map(Into::into),
            chassis_number: Some("c1".into()),
            config_operation_mode: Some("vmanage".into()),
            connection_state: Some("connected".into()),
            template: None,
        }
    }

    #[test]
    fn missing_template_gets_sentinel() {
        let rec = device_record(raw(Some("10.0.0.1"))).unwrap();
        assert_eq!(rec.attached_template, NO_TEMPLATE);
        assert_eq!(rec.config_mode, ConfigMode::TemplateManaged);
        assert_eq!(rec.chassis_id, "c1");
    }

    #[test]
    fn entries_without_system_ip_are_skipped() {
        assert!(device_record(raw(None)).is_none());
        assert!(device_record(raw(Some(""))).is_none());
    }

    #[test]
    fn unrecognized_mode_is_unknown_and_missing_fields_default() {
        let rec = device_record(RawDevice {
            system_ip: Some("10.0.0.9".into()),
            config_operation_mode: Some("hybrid".into()),
            ..RawDevice::default()
        })
        .unwrap();
        assert_eq!(rec.config_mode, ConfigMode::Unknown);
        assert_eq!(rec.host_name, "");
        assert_eq!(rec.chassis_id, "");
        assert_eq!(rec.label(), "10.0.0.9");
    }
}
