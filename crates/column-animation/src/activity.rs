// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Activity and visibility policies.

Activity decides which edges pulse in a phase; visibility decides which edges are drawn at
all. Both read the loop membership fixed on each edge at construction, never the id text.

| phase   | active iff                                             |
|---------|--------------------------------------------------------|
| all     | never                                                  |
| infer   | feedforward                                            |
| predict | feedback, or apical membership                         |
| update  | mismatch-loop membership (`T_to_L4E` and `L4_*` edges) |
*/

use column_structures::{Edge, EdgeKind, LoopMembership};

use crate::controls::ControlState;
use crate::phase::Phase;

/// Whether `edge` is emphasized in `phase`
pub fn is_active(phase: Phase, edge: &Edge) -> bool {
    classify(phase, edge.kind(), edge.membership())
}

/// Same policy for an edge known only by id and kind
pub fn is_edge_active(phase: Phase, edge_id: &str, kind: EdgeKind) -> bool {
    classify(phase, kind, LoopMembership::classify(edge_id))
}

fn classify(phase: Phase, kind: EdgeKind, membership: LoopMembership) -> bool {
    match phase {
        Phase::All => false,
        Phase::Infer => kind == EdgeKind::Feedforward,
        Phase::Predict => kind == EdgeKind::Feedback || membership == LoopMembership::Apical,
        Phase::Update => membership == LoopMembership::MismatchLoop,
    }
}

/// Whether `edge` is drawn, given the phase and the user toggles
///
/// Under `update` everything outside the mismatch loop is hidden regardless of toggles.
pub fn is_visible(phase: Phase, edge: &Edge, controls: &ControlState) -> bool {
    if phase == Phase::Update && edge.membership() != LoopMembership::MismatchLoop {
        return false;
    }
    match edge.kind() {
        EdgeKind::Feedforward => controls.show_feedforward && phase != Phase::Predict,
        EdgeKind::Feedback => controls.show_feedback && phase != Phase::Infer,
        EdgeKind::Recurrent | EdgeKind::Inhibitory => controls.show_recurrent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(id: &str, kind: EdgeKind) -> Edge {
        Edge::new(id, "a", "b", kind, None)
    }

    #[test]
    fn test_all_phase_never_active() {
        for kind in EdgeKind::ALL {
            for id in ["T_to_L4E", "L4_EE", "I_to_A5", "A5_to_L5", "L5_to_UP"] {
                assert!(!is_active(Phase::All, &edge(id, kind)));
            }
        }
    }

    #[test]
    fn test_infer_is_kind_only() {
        assert!(is_active(Phase::Infer, &edge("L5_to_UP", EdgeKind::Feedforward)));
        assert!(!is_active(Phase::Infer, &edge("L4_EE", EdgeKind::Recurrent)));
        assert!(!is_active(Phase::Infer, &edge("I_to_A23", EdgeKind::Feedback)));
    }

    #[test]
    fn test_predict_includes_apical_prefixes_of_any_kind() {
        assert!(is_active(Phase::Predict, &edge("L6CT_to_L4E", EdgeKind::Feedback)));
        assert!(is_active(Phase::Predict, &edge("I_custom", EdgeKind::Recurrent)));
        assert!(is_active(Phase::Predict, &edge("Axon", EdgeKind::Feedforward)));
        assert!(!is_active(Phase::Predict, &edge("L2_EI", EdgeKind::Recurrent)));
    }

    #[test]
    fn test_update_is_mismatch_loop() {
        assert!(is_active(Phase::Update, &edge("T_to_L4E", EdgeKind::Feedforward)));
        assert!(is_active(Phase::Update, &edge("L4_IE", EdgeKind::Inhibitory)));
        assert!(!is_active(Phase::Update, &edge("L6CT_to_L4E", EdgeKind::Feedback)));
    }

    #[test]
    fn test_id_based_entry_point_agrees() {
        for phase in [Phase::Infer, Phase::Predict, Phase::Update, Phase::All] {
            for kind in EdgeKind::ALL {
                for id in ["T_to_L4E", "L4_EI", "I_to_A5", "A23_to_L3", "L23_to_L5"] {
                    assert_eq!(
                        is_edge_active(phase, id, kind),
                        is_active(phase, &edge(id, kind))
                    );
                }
            }
        }
    }

    #[test]
    fn test_visibility_by_kind_and_phase() {
        let on = ControlState::default();
        let ff = edge("L2_to_L3", EdgeKind::Feedforward);
        let fb = edge("L6IT_to_L5", EdgeKind::Feedback);
        let rec = edge("L3_EE", EdgeKind::Recurrent);

        assert!(is_visible(Phase::All, &ff, &on));
        assert!(!is_visible(Phase::Predict, &ff, &on));
        assert!(is_visible(Phase::Infer, &ff, &on));

        assert!(!is_visible(Phase::Infer, &fb, &on));
        assert!(is_visible(Phase::Predict, &fb, &on));

        assert!(is_visible(Phase::Infer, &rec, &on));
        assert!(is_visible(Phase::Predict, &rec, &on));
    }

    #[test]
    fn test_toggles_hide_kinds() {
        let mut controls = ControlState::default();
        controls.show_recurrent = false;
        assert!(!is_visible(Phase::All, &edge("L2_IE", EdgeKind::Inhibitory), &controls));
        assert!(!is_visible(Phase::All, &edge("L2_EE", EdgeKind::Recurrent), &controls));

        controls.show_feedforward = false;
        assert!(!is_visible(Phase::Infer, &edge("L2_to_L3", EdgeKind::Feedforward), &controls));
    }

    #[test]
    fn test_update_isolates_mismatch_loop() {
        let on = ControlState::default();
        assert!(is_visible(Phase::Update, &edge("T_to_L4E", EdgeKind::Feedforward), &on));
        assert!(is_visible(Phase::Update, &edge("L4_EE", EdgeKind::Recurrent), &on));
        assert!(!is_visible(Phase::Update, &edge("L3_EE", EdgeKind::Recurrent), &on));
        assert!(!is_visible(Phase::Update, &edge("L6CT_to_L4E", EdgeKind::Feedback), &on));

        // The override only hides; toggles still apply inside the loop
        let mut off = on;
        off.show_recurrent = false;
        assert!(!is_visible(Phase::Update, &edge("L4_EE", EdgeKind::Recurrent), &off));
    }
}
