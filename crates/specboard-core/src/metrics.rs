use crate::project::Project;
use crate::types::FeatureStage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseCount {
    pub phase: String,
    pub count: usize,
}

/// Dashboard roll-ups derived from one Project snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_features: usize,
    pub features_by_stage: BTreeMap<FeatureStage, usize>,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub in_progress_tasks: usize,
    pub pending_tasks: usize,
    pub completion_percentage: u32,
    /// Buckets in first-seen order across features.
    pub tasks_by_phase: Vec<PhaseCount>,
    pub total_clarifications: usize,
    pub clarifications_by_feature: BTreeMap<String, usize>,
    pub total_checklist_items: usize,
    pub completed_checklist_items: usize,
}

impl Default for DashboardMetrics {
    fn default() -> Self {
        Self {
            total_features: 0,
            features_by_stage: FeatureStage::all().iter().map(|&s| (s, 0)).collect(),
            total_tasks: 0,
            completed_tasks: 0,
            in_progress_tasks: 0,
            pending_tasks: 0,
            completion_percentage: 0,
            tasks_by_phase: Vec::new(),
            total_clarifications: 0,
            clarifications_by_feature: BTreeMap::new(),
            total_checklist_items: 0,
            completed_checklist_items: 0,
        }
    }
}

/// `Phase 2: Core (US1, US2)` buckets as `Phase 2: Core`.
pub fn normalize_phase_name(name: &str) -> &str {
    name.split('(').next().unwrap_or(name).trim()
}

/// Rounded percentage, 0 when there is nothing to complete.
pub fn completion_percentage(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u32
}

pub fn compute_metrics(project: &Project) -> DashboardMetrics {
    let mut m = DashboardMetrics {
        total_features: project.features.len(),
        ..DashboardMetrics::default()
    };

    for feature in &project.features {
        *m.features_by_stage.entry(feature.stage).or_insert(0) += 1;
        m.total_tasks += feature.total_tasks;
        m.completed_tasks += feature.completed_tasks;
        m.in_progress_tasks += feature.in_progress_tasks;
        m.total_clarifications += feature.total_clarifications;
        m.clarifications_by_feature
            .insert(feature.id.clone(), feature.total_clarifications);
        m.total_checklist_items += feature.total_checklist_items;
        m.completed_checklist_items += feature.completed_checklist_items;

        for phase in &feature.phases {
            let name = normalize_phase_name(&phase.name);
            match m.tasks_by_phase.iter_mut().find(|b| b.phase == name) {
                Some(bucket) => bucket.count += phase.tasks.len(),
                None => m.tasks_by_phase.push(PhaseCount {
                    phase: name.to_string(),
                    count: phase.tasks.len(),
                }),
            }
        }
    }

    m.pending_tasks = m.total_tasks.saturating_sub(m.completed_tasks);
    m.completion_percentage = completion_percentage(m.completed_tasks, m.total_tasks);
    m
}
