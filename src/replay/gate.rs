//! Two-stage trigger gate
//!
//! A shot only counts when the ball passes the arm zone and then the fire zone.
//! Firing disarms the gate, so one pass produces exactly one replay no matter how
//! many contacts follow.

/// Spatial trigger roles reported by the host collision system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneRole {
    Arm,
    Fire,
}

impl std::fmt::Display for ZoneRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZoneRole::Arm => write!(f, "arm"),
            ZoneRole::Fire => write!(f, "fire"),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TriggerGate {
    armed: bool,
}

impl TriggerGate {
    /// Arm the gate. Returns true on the Unarmed -> Armed transition.
    pub fn on_arm(&mut self) -> bool {
        let was_armed = self.armed;
        self.armed = true;
        !was_armed
    }

    /// Returns true when the gate was armed and has now fired (and disarmed).
    pub fn on_fire(&mut self) -> bool {
        if !self.armed {
            return false;
        }
        self.armed = false;
        true
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn reset(&mut self) {
        self.armed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_before_arm_is_ignored() {
        let mut gate = TriggerGate::default();
        assert!(!gate.on_fire());
        assert!(!gate.is_armed());
    }

    #[test]
    fn test_arm_fire_fire_fires_once() {
        let mut gate = TriggerGate::default();
        assert!(gate.on_arm());
        assert!(gate.on_fire());
        assert!(!gate.on_fire());
        assert!(!gate.is_armed());
    }

    #[test]
    fn test_rearm_is_noop() {
        let mut gate = TriggerGate::default();
        assert!(gate.on_arm());
        assert!(!gate.on_arm());
        assert!(gate.is_armed());
        assert!(gate.on_fire());
    }
}
