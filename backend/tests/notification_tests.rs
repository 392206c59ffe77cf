//! Notification composition tests
//!
//! Covers the consolidated alert e-mail and the auto-generated task fields:
//! - One e-mail per evaluation with one bullet per fired alert
//! - Subject carries the farm name
//! - Task due dates sit 48 hours after creation

use chrono::{Duration, Utc};

// ============================================================================
// Test data structures
// ============================================================================

#[derive(Debug, Clone)]
struct FiredAlert {
    alert_type: &'static str,
    message: String,
}

#[derive(Debug, Clone)]
struct Email {
    subject: String,
    text: String,
    html: String,
}

fn build_email(farm_name: &str, alerts: &[FiredAlert]) -> Email {
    let mut items_html = String::new();
    let mut items_text = String::new();
    for alert in alerts {
        items_html.push_str(&format!(
            "<li><strong>{}:</strong> {}</li>",
            alert.alert_type, alert.message
        ));
        items_text.push_str(&format!("- {}: {}\n", alert.alert_type, alert.message));
    }

    Email {
        subject: format!("AgroSat | Novos alertas para {}", farm_name),
        text: format!(
            "Novos alertas de monitoramento para a fazenda {}:\n{}",
            farm_name, items_text
        ),
        html: format!(
            "<p>Novos alertas de monitoramento para a fazenda <strong>{}</strong>:</p><ul>{}</ul>",
            farm_name, items_html
        ),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn test_subject_includes_farm_name() {
    let email = build_email(
        "Fazenda Boa Vista",
        &[FiredAlert {
            alert_type: "ESTRESSE VEGETATIVO",
            message: "NDVI em 0.31".to_string(),
        }],
    );
    assert!(email.subject.contains("Fazenda Boa Vista"));
}

#[test]
fn test_one_bullet_per_alert() {
    let alerts = vec![
        FiredAlert {
            alert_type: "DÉFICIT HÍDRICO",
            message: "NDWI em -0.20".to_string(),
        },
        FiredAlert {
            alert_type: "AQUECIMENTO SUPERFICIAL",
            message: "35.0°C na superfície".to_string(),
        },
        FiredAlert {
            alert_type: "ALERTA SAR (RADAR ATIVO)",
            message: "Cobertura de nuvens em 70%".to_string(),
        },
    ];

    let email = build_email("Fazenda Santa Clara", &alerts);

    assert_eq!(email.html.matches("<li>").count(), 3);
    assert_eq!(email.text.matches("- ").count(), 3);
    for alert in &alerts {
        assert!(email.html.contains(alert.alert_type));
        assert!(email.text.contains(alert.alert_type));
    }
}

#[test]
fn test_bullet_order_follows_alert_order() {
    let alerts = vec![
        FiredAlert {
            alert_type: "ONDA DE CALOR (PREVISÃO)",
            message: "Máxima prevista de 40.0°C".to_string(),
        },
        FiredAlert {
            alert_type: "ALERTA DE SECA SEVERA (PREVISÃO)",
            message: "Sem chuva prevista".to_string(),
        },
    ];

    let email = build_email("Fazenda Santa Clara", &alerts);

    let heat = email.text.find("ONDA DE CALOR").unwrap();
    let drought = email.text.find("ALERTA DE SECA SEVERA").unwrap();
    assert!(heat < drought);
}

#[test]
fn test_task_due_date_is_48_hours() {
    let created = Utc::now();
    let due = created + Duration::hours(48);

    assert_eq!(due - created, Duration::hours(48));
    assert!(due > created + Duration::hours(47));
    assert!(due < created + Duration::hours(49));
}

#[test]
fn test_html_and_text_parts_agree_on_content() {
    let alerts = vec![FiredAlert {
        alert_type: "RISCO DE DESMATAMENTO",
        message: "Padrão de supressão vegetal detectado".to_string(),
    }];

    let email = build_email("Fazenda Santa Clara", &alerts);

    assert!(email.html.contains("RISCO DE DESMATAMENTO"));
    assert!(email.text.contains("RISCO DE DESMATAMENTO"));
    assert!(email.html.contains("supressão vegetal"));
    assert!(email.text.contains("supressão vegetal"));
}
