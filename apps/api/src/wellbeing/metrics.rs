//! Local, deterministic well-being metrics. Nothing here calls the advisor.

use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use crate::models::user::{round1, User};
use crate::models::wellbeing::WellbeingCheckRow;

const BURNOUT_ALERT_RISK: i32 = 70;
const MIN_CHECKS_FOR_PATTERNS: usize = 3;
const TREND_WINDOW: usize = 3;
const DECLINE_MARGIN: f64 = 0.5;

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LocalMetrics {
    pub average_mood: f64,
    pub average_energy: f64,
    pub mood_distribution: BTreeMap<&'static str, usize>,
    pub energy_distribution: BTreeMap<&'static str, usize>,
    pub concerning_checks: usize,
    pub concerning_percentage: f64,
}

fn average1(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| round1(mean(values)))
}

/// `None` when there are no checks.
pub fn local_metrics(checks: &[WellbeingCheckRow]) -> Option<LocalMetrics> {
    if checks.is_empty() {
        return None;
    }
    let moods: Vec<f64> = checks.iter().map(|c| c.mood.score() as f64).collect();
    let energies: Vec<f64> = checks.iter().map(|c| c.energy.score() as f64).collect();

    let mut mood_distribution = BTreeMap::new();
    let mut energy_distribution = BTreeMap::new();
    for c in checks {
        *mood_distribution.entry(c.mood.as_str()).or_insert(0) += 1;
        *energy_distribution.entry(c.energy.as_str()).or_insert(0) += 1;
    }

    let concerning = checks.iter().filter(|c| c.is_concerning()).count();

    Some(LocalMetrics {
        average_mood: round2(mean(&moods)),
        average_energy: round2(mean(&energies)),
        mood_distribution,
        energy_distribution,
        concerning_checks: concerning,
        concerning_percentage: round1(concerning as f64 / checks.len() as f64 * 100.0),
    })
}

/// Mean of the last window below mean of the first window by more than the margin.
fn is_declining(scores: &[f64]) -> bool {
    if scores.len() < TREND_WINDOW {
        return false;
    }
    let older = mean(&scores[..TREND_WINDOW]);
    let recent = mean(&scores[scores.len() - TREND_WINDOW..]);
    recent < older - DECLINE_MARGIN
}

fn mostly_low(scores: &[f64]) -> bool {
    let low = scores.iter().filter(|s| **s <= 2.0).count();
    low as f64 / scores.len() as f64 > 0.5
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Patterns {
    pub declining_mood: bool,
    pub declining_energy: bool,
    pub consistent_low_mood: bool,
    pub consistent_low_energy: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BurnoutReport {
    pub has_pattern: bool,
    pub risk_score: u32,
    pub patterns: Patterns,
    pub severity: &'static str,
    pub recommendations: Vec<&'static str>,
}

/// `checks` must be oldest first. `None` when there are fewer than three checks.
pub fn burnout_patterns(checks: &[WellbeingCheckRow], threshold: u32) -> Option<BurnoutReport> {
    if checks.len() < MIN_CHECKS_FOR_PATTERNS {
        return None;
    }
    let moods: Vec<f64> = checks.iter().map(|c| c.mood.score() as f64).collect();
    let energies: Vec<f64> = checks.iter().map(|c| c.energy.score() as f64).collect();

    let patterns = Patterns {
        declining_mood: is_declining(&moods),
        declining_energy: is_declining(&energies),
        consistent_low_mood: mostly_low(&moods),
        consistent_low_energy: mostly_low(&energies),
    };

    let risk_score: u32 = [
        (patterns.declining_mood, 30u32),
        (patterns.declining_energy, 30),
        (patterns.consistent_low_mood, 20),
        (patterns.consistent_low_energy, 20),
    ]
    .iter()
    .filter(|(hit, _)| *hit)
    .map(|(_, points)| points)
    .sum();

    let severity = match risk_score {
        80.. => "high",
        50.. => "medium",
        _ => "low",
    };

    Some(BurnoutReport {
        has_pattern: risk_score >= threshold,
        risk_score,
        recommendations: burnout_recommendations(risk_score, &patterns),
        patterns,
        severity,
    })
}

fn burnout_recommendations(risk_score: u32, patterns: &Patterns) -> Vec<&'static str> {
    let mut recs = Vec::new();
    if risk_score >= 70 {
        recs.push("Urgent attention needed: consider a one-on-one conversation");
        recs.push("Suggest reducing workload or redistributing tasks");
        recs.push("Consider referral to professional support");
    }
    if patterns.declining_mood {
        recs.push("Mood is declining: offer emotional support");
    }
    if patterns.declining_energy {
        recs.push("Energy is dropping: check for possible overload");
    }
    if patterns.consistent_low_energy {
        recs.push("Consistently low energy: suggest breaks and rest");
    }
    if recs.is_empty() {
        recs.push("Keep monitoring regularly");
    }
    recs
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberWellbeing {
    pub user_id: Uuid,
    pub name: String,
    pub mood: &'static str,
    pub mood_emoji: &'static str,
    pub energy: &'static str,
    pub energy_bars: &'static str,
    pub workload: f64,
    pub is_concerning: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub burnout_risk: Option<i32>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamAlert {
    pub severity: Severity,
    pub user: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AverageScores {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub burnout_risk: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamWellbeingSummary {
    pub team_size: usize,
    pub period_days: i64,
    pub members_analysis: Vec<MemberWellbeing>,
    pub alerts: Vec<TeamAlert>,
    pub average_scores: AverageScores,
    pub trend: &'static str,
}

/// Builds the team summary from each member and their latest check in the period.
/// Members without a check count toward `team_size` only.
pub fn team_summary(members: &[(User, Option<WellbeingCheckRow>)], period_days: i64) -> TeamWellbeingSummary {
    let mut analysis = Vec::new();
    let mut alerts = Vec::new();
    let mut moods = Vec::new();
    let mut energies = Vec::new();
    let mut risks = Vec::new();

    for (member, latest) in members {
        let Some(check) = latest else { continue };
        moods.push(check.mood.score() as f64);
        energies.push(check.energy.score() as f64);

        if let Some(risk) = check.ai_burnout_risk {
            risks.push(risk as f64);
            if risk > BURNOUT_ALERT_RISK {
                alerts.push(TeamAlert {
                    severity: Severity::High,
                    user: member.full_name.clone(),
                    kind: "burnout_risk",
                    message: format!("{} shows a high burnout risk ({risk}%)", member.full_name),
                });
            }
        }
        if member.is_overloaded() {
            alerts.push(TeamAlert {
                severity: Severity::Medium,
                user: member.full_name.clone(),
                kind: "overload",
                message: format!(
                    "{} is overloaded ({:.0}% of capacity)",
                    member.full_name,
                    member.workload_percentage()
                ),
            });
        }
        if check.is_concerning() {
            alerts.push(TeamAlert {
                severity: Severity::Medium,
                user: member.full_name.clone(),
                kind: "wellbeing",
                message: format!("{} reported low well-being", member.full_name),
            });
        }

        analysis.push(MemberWellbeing {
            user_id: member.id,
            name: member.full_name.clone(),
            mood: check.mood.as_str(),
            mood_emoji: check.mood.emoji(),
            energy: check.energy.as_str(),
            energy_bars: check.energy.bars(),
            workload: round1(member.workload_percentage()),
            is_concerning: check.is_concerning(),
            burnout_risk: check.ai_burnout_risk,
        });
    }

    // Stable sort keeps member order within a severity.
    alerts.sort_by(|a, b| b.severity.cmp(&a.severity));

    let average_mood = average1(&moods);
    let trend = match average_mood {
        Some(m) if m >= 4.0 => "positive",
        Some(m) if m <= 2.0 => "concerning",
        _ => "stable",
    };

    TeamWellbeingSummary {
        team_size: members.len(),
        period_days,
        members_analysis: analysis,
        alerts,
        average_scores: AverageScores {
            mood: average_mood,
            energy: average1(&energies),
            burnout_risk: average1(&risks),
        },
        trend,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{test_user, UserRole};
    use crate::models::wellbeing::{test_check, EnergyLevel, MoodLevel};

    fn series(moods: &[MoodLevel], energy: EnergyLevel) -> Vec<WellbeingCheckRow> {
        moods.iter().map(|m| test_check(*m, energy)).collect()
    }

    #[test]
    fn test_local_metrics() {
        let checks = vec![
            test_check(MoodLevel::Good, EnergyLevel::High),
            test_check(MoodLevel::Bad, EnergyLevel::Medium),
            test_check(MoodLevel::Good, EnergyLevel::Low),
        ];
        let m = local_metrics(&checks).unwrap();
        assert_eq!(m.average_mood, 3.33);
        assert_eq!(m.average_energy, 3.0);
        assert_eq!(m.mood_distribution["good"], 2);
        assert_eq!(m.concerning_checks, 2);
        assert_eq!(m.concerning_percentage, 66.7);
        assert!(local_metrics(&[]).is_none());
    }

    #[test]
    fn test_patterns_need_three_checks() {
        let checks = series(&[MoodLevel::Bad, MoodLevel::Bad], EnergyLevel::Low);
        assert!(burnout_patterns(&checks, 70).is_none());
    }

    #[test]
    fn test_declining_mood_detected() {
        use MoodLevel::*;
        let checks = series(&[VeryGood, VeryGood, Good, Neutral, Bad, Bad], EnergyLevel::Medium);
        let report = burnout_patterns(&checks, 70).unwrap();
        assert!(report.patterns.declining_mood);
        assert!(!report.patterns.declining_energy);
        assert!(!report.patterns.consistent_low_mood);
        assert_eq!(report.risk_score, 30);
        assert_eq!(report.severity, "low");
        assert!(!report.has_pattern);
        assert!(report.recommendations.iter().any(|r| r.contains("Mood is declining")));
    }

    #[test]
    fn test_all_patterns_max_risk() {
        let mut checks = series(
            &[MoodLevel::VeryGood, MoodLevel::VeryGood, MoodLevel::VeryGood],
            EnergyLevel::VeryHigh,
        );
        checks.extend(series(
            &[MoodLevel::VeryBad, MoodLevel::VeryBad, MoodLevel::VeryBad, MoodLevel::VeryBad],
            EnergyLevel::Exhausted,
        ));
        let report = burnout_patterns(&checks, 70).unwrap();
        assert_eq!(report.risk_score, 100);
        assert_eq!(report.severity, "high");
        assert!(report.has_pattern);
        assert!(report.recommendations[0].starts_with("Urgent attention"));
    }

    #[test]
    fn test_steady_checks_recommend_monitoring() {
        let checks = series(&[MoodLevel::Good; 4], EnergyLevel::High);
        let report = burnout_patterns(&checks, 70).unwrap();
        assert_eq!(report.risk_score, 0);
        assert_eq!(report.recommendations, vec!["Keep monitoring regularly"]);
    }

    #[test]
    fn test_team_summary_alerts_sorted_by_severity() {
        let overloaded = test_user(UserRole::Member, 39.0, 40);
        let mut at_risk_check = test_check(MoodLevel::Neutral, EnergyLevel::Medium);
        at_risk_check.ai_burnout_risk = Some(85);
        let at_risk = test_user(UserRole::Member, 10.0, 40);
        let silent = test_user(UserRole::Member, 0.0, 40);

        let members = vec![
            (overloaded, Some(test_check(MoodLevel::Good, EnergyLevel::High))),
            (at_risk, Some(at_risk_check)),
            (silent, None),
        ];
        let summary = team_summary(&members, 7);

        assert_eq!(summary.team_size, 3);
        assert_eq!(summary.members_analysis.len(), 2);
        assert_eq!(summary.alerts.len(), 2);
        assert_eq!(summary.alerts[0].severity, Severity::High);
        assert_eq!(summary.alerts[0].kind, "burnout_risk");
        assert_eq!(summary.alerts[1].kind, "overload");
        assert_eq!(summary.average_scores.mood, Some(3.5));
        assert_eq!(summary.average_scores.burnout_risk, Some(85.0));
        assert_eq!(summary.trend, "stable");
    }

    #[test]
    fn test_team_trend_thresholds() {
        let happy = vec![(
            test_user(UserRole::Member, 0.0, 40),
            Some(test_check(MoodLevel::VeryGood, EnergyLevel::High)),
        )];
        assert_eq!(team_summary(&happy, 7).trend, "positive");

        let sad = vec![(
            test_user(UserRole::Member, 0.0, 40),
            Some(test_check(MoodLevel::Bad, EnergyLevel::High)),
        )];
        assert_eq!(team_summary(&sad, 7).trend, "concerning");

        let empty: Vec<(User, Option<WellbeingCheckRow>)> = vec![];
        let summary = team_summary(&empty, 7);
        assert_eq!(summary.trend, "stable");
        assert!(summary.average_scores.mood.is_none());
    }
}
