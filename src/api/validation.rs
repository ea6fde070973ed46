use crate::error::{RigError, RigResult};

use super::RigConfig;

pub(super) fn validate_rig_config(config: RigConfig) -> RigResult<RigConfig> {
    for (name, value) in [
        ("machine_force_limit_kn", config.machine_force_limit_kn),
        ("min_sample_delay_s", config.min_sample_delay_s),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(RigError::Configuration(format!(
                "`{name}` must be finite and > 0"
            )));
        }
    }

    if !config.post_rupture_fallback_s.is_finite() || config.post_rupture_fallback_s < 0.0 {
        return Err(RigError::Configuration(
            "`post_rupture_fallback_s` must be finite and >= 0".to_owned(),
        ));
    }

    let attach = config.extensometer_attach_ratio;
    let detach = config.extensometer_detach_ratio;
    if !(attach.is_finite() && detach.is_finite()) || attach < 0.0 || detach > 1.0 {
        return Err(RigError::Configuration(
            "extensometer ratios must lie within [0, 1]".to_owned(),
        ));
    }
    if attach >= detach {
        return Err(RigError::Configuration(format!(
            "extensometer attach ratio ({attach}) must be below detach ratio ({detach})"
        )));
    }

    if !config.plot_viewport.is_valid() {
        return Err(RigError::InvalidViewport {
            width: config.plot_viewport.width,
            height: config.plot_viewport.height,
        });
    }

    Ok(config)
}
