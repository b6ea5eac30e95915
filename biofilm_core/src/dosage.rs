//! Chemical dosage calculator.
//!
//! Each rule is evaluated independently; zero, one or several treatments may
//! apply. Amounts are proportional to tank volume and always rounded up so a
//! tank is never under-dosed. An empty list means the system is nominal.

use crate::config::DosageRules;
use crate::dss::Decision;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chemical {
    Chlorine,
    PhPlus,
    PhMinus,
}

impl Chemical {
    pub fn name(&self) -> &'static str {
        match self {
            Chemical::Chlorine => "Chlorine",
            Chemical::PhPlus => "pH Plus",
            Chemical::PhMinus => "pH Minus",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Chemical::Chlorine => "ml",
            Chemical::PhPlus | Chemical::PhMinus => "g",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Treatment {
    pub chemical: Chemical,
    pub amount: u32,
    pub reason: String,
}

impl Treatment {
    pub fn unit(&self) -> &'static str {
        self.chemical.unit()
    }
}

/// `ceil(volume_l / 1000 * per_1000l)`, saturating into `u32`.
///
/// Multiplies before dividing so integral doses stay exact (1000 L at 50/1000 L is
/// exactly 50, not 50.000000001 rounded up to 51).
pub fn proportional_dose(volume_l: u32, per_1000l: f64) -> u32 {
    if !per_1000l.is_finite() || per_1000l <= 0.0 {
        return 0;
    }
    let raw = (f64::from(volume_l) * per_1000l / 1000.0).ceil();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let amount = raw.clamp(0.0, f64::from(u32::MAX)) as u32;
    amount
}

pub fn calculate(
    decision: Decision,
    risk: f64,
    ph: Option<f64>,
    volume_l: u32,
    rules: &DosageRules,
) -> Vec<Treatment> {
    let mut out = Vec::new();
    let dose = proportional_dose(volume_l, rules.dose_per_1000l);

    if risk >= rules.risk_threshold || decision != Decision::NormalOperation {
        out.push(Treatment {
            chemical: Chemical::Chlorine,
            amount: dose,
            reason: "Biofilm risk / Preventive maintenance".to_string(),
        });
    }
    if let Some(ph) = ph {
        if ph < rules.ph_low {
            out.push(Treatment {
                chemical: Chemical::PhPlus,
                amount: dose,
                reason: format!("Low pH (< {})", rules.ph_low),
            });
        } else if ph > rules.ph_high {
            out.push(Treatment {
                chemical: Chemical::PhMinus,
                amount: dose,
                reason: format!("High pH (> {})", rules.ph_high),
            });
        }
    }
    out
}
