//! Alert rules evaluated against each new satellite reading
//!
//! Each rule is an independent pure function over the reading, the owning
//! farm, the (possibly absent) climate outlook, and the risk draw. Rules are
//! evaluated in a fixed order; that order determines alert list order and
//! therefore the bullet order of the notification e-mail. Adding a rule means
//! adding a function and one entry to `RULES`.

use shared::models::ClimateSummary;

use crate::services::farms::Farm;
use crate::services::readings::Reading;
use crate::services::tasks::TaskPriority;

/// NDVI below this indicates loss of vegetative vigor
const NDVI_STRESS_THRESHOLD: f64 = 0.4;
/// NDWI below this indicates severe water deficit
const NDWI_DEFICIT_THRESHOLD: f64 = -0.15;
/// Surface temperature above this (°C) risks floral abortion
const SURFACE_HEAT_THRESHOLD: f64 = 32.0;
/// Forecast weekly maximum above this (°C) is a heat wave
const HEAT_WAVE_THRESHOLD: f64 = 37.0;
/// Cloud cover above this fraction leaves only SAR radar usable
const CLOUD_COVER_THRESHOLD: f64 = 0.6;

/// Everything a rule may inspect for one evaluation
pub struct RuleContext<'a> {
    pub reading: &'a Reading,
    pub farm: &'a Farm,
    /// None when the forecast fetch failed or timed out
    pub forecast: Option<&'a ClimateSummary>,
    /// Uniform draw in [0, 1) from the injected sampler
    pub risk_draw: f64,
    /// Probability threshold for the deforestation-risk rule
    pub risk_probability: f64,
}

/// A remediation task to attach to a fired alert
#[derive(Debug, Clone, PartialEq)]
pub struct TaskTemplate {
    pub title: &'static str,
    pub description: String,
    pub priority: TaskPriority,
}

/// One rule firing on one reading evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct FiredAlert {
    pub alert_type: &'static str,
    pub message: String,
    pub task: Option<TaskTemplate>,
    /// When true, the farm's deforestation latch is set during persistence
    pub latches_deforestation: bool,
}

impl FiredAlert {
    fn new(alert_type: &'static str, message: String) -> Self {
        Self {
            alert_type,
            message,
            task: None,
            latches_deforestation: false,
        }
    }

    fn with_task(mut self, title: &'static str, description: String, priority: TaskPriority) -> Self {
        self.task = Some(TaskTemplate {
            title,
            description,
            priority,
        });
        self
    }
}

type Rule = fn(&RuleContext) -> Option<FiredAlert>;

/// The rule set, in evaluation order
const RULES: &[Rule] = &[
    vegetative_stress,
    water_deficit,
    surface_heating,
    heat_wave,
    severe_drought,
    sar_fallback,
    deforestation_risk,
];

/// Evaluate every rule against one reading, in order
pub fn evaluate(ctx: &RuleContext) -> Vec<FiredAlert> {
    RULES.iter().filter_map(|rule| rule(ctx)).collect()
}

fn vegetative_stress(ctx: &RuleContext) -> Option<FiredAlert> {
    if ctx.reading.ndvi >= NDVI_STRESS_THRESHOLD {
        return None;
    }
    Some(
        FiredAlert::new(
            "ESTRESSE VEGETATIVO",
            format!(
                "NDVI em {:.2} indica perda de vigor vegetativo",
                ctx.reading.ndvi
            ),
        )
        .with_task(
            "Vistoria de Vigor",
            format!(
                "Realizar vistoria de campo para investigar a queda de vigor (NDVI {:.2}).",
                ctx.reading.ndvi
            ),
            TaskPriority::High,
        ),
    )
}

fn water_deficit(ctx: &RuleContext) -> Option<FiredAlert> {
    if ctx.reading.ndwi >= NDWI_DEFICIT_THRESHOLD {
        return None;
    }
    Some(
        FiredAlert::new(
            "DÉFICIT HÍDRICO",
            format!(
                "NDWI em {:.2} indica déficit hídrico severo na lavoura",
                ctx.reading.ndwi
            ),
        )
        .with_task(
            "Inspeção de Estresse Hídrico",
            format!(
                "Inspecionar o sistema de irrigação e avaliar o estresse hídrico (NDWI {:.2}).",
                ctx.reading.ndwi
            ),
            TaskPriority::Critical,
        ),
    )
}

fn surface_heating(ctx: &RuleContext) -> Option<FiredAlert> {
    let temperature = ctx.reading.temperature?;
    if temperature <= SURFACE_HEAT_THRESHOLD {
        return None;
    }
    Some(
        FiredAlert::new(
            "AQUECIMENTO SUPERFICIAL",
            format!(
                "Temperatura de superfície em {:.1}°C, acima do limite de {:.0}°C",
                temperature, SURFACE_HEAT_THRESHOLD
            ),
        )
        .with_task(
            "Risco de Abortamento Floral",
            format!(
                "Avaliar o risco de abortamento floral sob temperatura de {:.1}°C.",
                temperature
            ),
            TaskPriority::Medium,
        ),
    )
}

fn heat_wave(ctx: &RuleContext) -> Option<FiredAlert> {
    let forecast = ctx.forecast?;
    if forecast.max_temp_week <= HEAT_WAVE_THRESHOLD {
        return None;
    }
    Some(
        FiredAlert::new(
            "ONDA DE CALOR (PREVISÃO)",
            format!(
                "Máxima prevista de {:.1}°C nos próximos 5 dias",
                forecast.max_temp_week
            ),
        )
        .with_task(
            "Preparação para Onda de Calor",
            format!(
                "Preparar irrigação e manejo para máxima prevista de {:.1}°C.",
                forecast.max_temp_week
            ),
            TaskPriority::Critical,
        ),
    )
}

fn severe_drought(ctx: &RuleContext) -> Option<FiredAlert> {
    let forecast = ctx.forecast?;
    if !forecast.is_dry_week() || ctx.reading.ndwi >= 0.0 {
        return None;
    }
    Some(
        FiredAlert::new(
            "ALERTA DE SECA SEVERA (PREVISÃO)",
            format!(
                "Sem chuva prevista para os próximos 5 dias e NDWI em {:.2}",
                ctx.reading.ndwi
            ),
        )
        .with_task(
            "Mitigação de Seca Prolongada",
            "Planejar mitigação de seca: nenhuma chuva prevista na semana.".to_string(),
            TaskPriority::High,
        ),
    )
}

fn sar_fallback(ctx: &RuleContext) -> Option<FiredAlert> {
    let cloud_cover = ctx.reading.cloud_cover?;
    if cloud_cover <= CLOUD_COVER_THRESHOLD {
        return None;
    }
    // Informational only: no task
    Some(FiredAlert::new(
        "ALERTA SAR (RADAR ATIVO)",
        format!(
            "Cobertura de nuvens em {:.0}%: monitoramento óptico limitado, radar SAR em uso",
            cloud_cover * 100.0
        ),
    ))
}

/// Stand-in for a computer-vision deforestation detector: an injected uniform
/// draw against a configured probability. The farm latch guarantees at most
/// one firing per farm.
fn deforestation_risk(ctx: &RuleContext) -> Option<FiredAlert> {
    if ctx.farm.is_deforested || ctx.risk_draw >= ctx.risk_probability {
        return None;
    }
    let mut alert = FiredAlert::new(
        "RISCO DE DESMATAMENTO",
        "Padrão de supressão vegetal detectado em área da fazenda".to_string(),
    )
    .with_task(
        "Auditoria ESG Obrigatória",
        "Conduzir auditoria ESG e verificação de desmatamento em campo.".to_string(),
        TaskPriority::Critical,
    );
    alert.latches_deforestation = true;
    Some(alert)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use shared::types::GpsCoordinates;
    use std::str::FromStr;
    use uuid::Uuid;

    fn farm(is_deforested: bool) -> Farm {
        Farm {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: "Fazenda Santa Clara".to_string(),
            latitude: Decimal::from_str("-21.1775").unwrap(),
            longitude: Decimal::from_str("-47.8103").unwrap(),
            is_deforested,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn reading(ndvi: f64, ndwi: f64, temperature: Option<f64>, cloud_cover: Option<f64>) -> Reading {
        Reading {
            id: Uuid::new_v4(),
            farm_id: Uuid::new_v4(),
            date: Utc::now(),
            ndvi,
            ndwi,
            temperature,
            cloud_cover,
            created_at: Utc::now(),
        }
    }

    fn forecast(max_temp_week: f64, total_rain_week: f64) -> ClimateSummary {
        ClimateSummary {
            location: GpsCoordinates::new(
                Decimal::from_str("-21.1775").unwrap(),
                Decimal::from_str("-47.8103").unwrap(),
            ),
            current_temp: 28.0,
            conditions: "céu limpo".to_string(),
            max_temp_week,
            total_rain_week,
            daily: vec![],
        }
    }

    fn ctx<'a>(
        reading: &'a Reading,
        farm: &'a Farm,
        forecast: Option<&'a ClimateSummary>,
        risk_draw: f64,
    ) -> RuleContext<'a> {
        RuleContext {
            reading,
            farm,
            forecast,
            risk_draw,
            risk_probability: 0.05,
        }
    }

    #[test]
    fn healthy_reading_fires_nothing() {
        let r = reading(0.7, 0.2, Some(25.0), Some(0.1));
        let f = farm(false);
        let fired = evaluate(&ctx(&r, &f, None, 0.9));
        assert!(fired.is_empty());
    }

    #[test]
    fn low_ndvi_fires_vegetative_stress_only() {
        let r = reading(0.3, 0.1, Some(25.0), Some(0.1));
        let f = farm(false);
        let fired = evaluate(&ctx(&r, &f, None, 0.9));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].alert_type, "ESTRESSE VEGETATIVO");
        let task = fired[0].task.as_ref().unwrap();
        assert_eq!(task.title, "Vistoria de Vigor");
        assert_eq!(task.priority, TaskPriority::High);
    }

    #[test]
    fn ndvi_boundary_does_not_fire() {
        let r = reading(0.4, 0.1, None, None);
        let f = farm(false);
        assert!(vegetative_stress(&ctx(&r, &f, None, 0.9)).is_none());
    }

    #[test]
    fn combined_reading_fires_rules_in_order() {
        // ndwi < -0.15, temperature > 32, cloud_cover > 0.6; no forecast
        let r = reading(0.5, -0.2, Some(35.0), Some(0.7));
        let f = farm(false);
        let fired = evaluate(&ctx(&r, &f, None, 0.9));
        let types: Vec<&str> = fired.iter().map(|a| a.alert_type).collect();
        assert_eq!(
            types,
            vec![
                "DÉFICIT HÍDRICO",
                "AQUECIMENTO SUPERFICIAL",
                "ALERTA SAR (RADAR ATIVO)",
            ]
        );
        // SAR alert is informational only
        assert!(fired[2].task.is_none());
    }

    #[test]
    fn missing_temperature_skips_surface_heating() {
        let r = reading(0.5, 0.1, None, None);
        let f = farm(false);
        assert!(surface_heating(&ctx(&r, &f, None, 0.9)).is_none());
    }

    #[test]
    fn forecast_rules_skip_without_forecast() {
        let r = reading(0.5, -0.05, None, None);
        let f = farm(false);
        let c = ctx(&r, &f, None, 0.9);
        assert!(heat_wave(&c).is_none());
        assert!(severe_drought(&c).is_none());
    }

    #[test]
    fn heat_wave_and_drought_both_fire() {
        let r = reading(0.5, -0.05, None, None);
        let f = farm(false);
        let summary = forecast(40.0, 0.0);
        let fired = evaluate(&ctx(&r, &f, Some(&summary), 0.9));
        let types: Vec<&str> = fired.iter().map(|a| a.alert_type).collect();
        assert_eq!(
            types,
            vec![
                "ONDA DE CALOR (PREVISÃO)",
                "ALERTA DE SECA SEVERA (PREVISÃO)",
            ]
        );
    }

    #[test]
    fn drought_requires_negative_ndwi() {
        // Boundary: ndwi = 0 must not fire even in a dry week
        let r = reading(0.5, 0.0, None, None);
        let f = farm(false);
        let summary = forecast(30.0, 0.0);
        assert!(severe_drought(&ctx(&r, &f, Some(&summary), 0.9)).is_none());
    }

    #[test]
    fn drought_requires_dry_week() {
        let r = reading(0.5, -0.1, None, None);
        let f = farm(false);
        let summary = forecast(30.0, 3.5);
        assert!(severe_drought(&ctx(&r, &f, Some(&summary), 0.9)).is_none());
    }

    #[test]
    fn deforestation_risk_fires_on_low_draw() {
        let r = reading(0.7, 0.2, None, None);
        let f = farm(false);
        let fired = evaluate(&ctx(&r, &f, None, 0.01));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].alert_type, "RISCO DE DESMATAMENTO");
        assert!(fired[0].latches_deforestation);
        assert_eq!(
            fired[0].task.as_ref().unwrap().title,
            "Auditoria ESG Obrigatória"
        );
    }

    #[test]
    fn deforestation_risk_respects_latch() {
        let r = reading(0.7, 0.2, None, None);
        let f = farm(true);
        // Even a certain draw never re-fires once the farm is latched
        assert!(deforestation_risk(&ctx(&r, &f, None, 0.0)).is_none());
    }

    #[test]
    fn deforestation_risk_misses_on_high_draw() {
        let r = reading(0.7, 0.2, None, None);
        let f = farm(false);
        assert!(deforestation_risk(&ctx(&r, &f, None, 0.05)).is_none());
    }
}
