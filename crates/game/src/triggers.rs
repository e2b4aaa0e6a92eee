//! Spherical position triggers around the walking character.

use engine_core::Vec3;

/// Passed to a trigger's callback when it fires.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerHit {
    pub name: String,
    pub position: Vec3,
}

pub type TriggerCallback = Box<dyn FnMut(&TriggerHit)>;

pub struct PositionTrigger {
    pub name: String,
    pub location: Vec3,
    pub radius: f32,
    pub fire_once: bool,
    fired: bool,
    callback: Option<TriggerCallback>,
}

impl std::fmt::Debug for PositionTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PositionTrigger")
            .field("name", &self.name)
            .field("location", &self.location)
            .field("radius", &self.radius)
            .field("fire_once", &self.fire_once)
            .field("fired", &self.fired)
            .finish_non_exhaustive()
    }
}

impl PositionTrigger {
    /// A once-only trigger with a radius of 2.
    pub fn new(name: impl Into<String>, location: Vec3) -> Self {
        Self {
            name: name.into(),
            location,
            radius: 2.0,
            fire_once: true,
            fired: false,
            callback: None,
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius.max(0.0);
        self
    }

    pub fn repeating(mut self) -> Self {
        self.fire_once = false;
        self
    }

    pub fn on_enter(mut self, callback: impl FnMut(&TriggerHit) + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    pub fn fired(&self) -> bool {
        self.fired
    }

    fn contains(&self, p: Vec3) -> bool {
        p.distance_squared(self.location) <= self.radius * self.radius
    }
}

#[derive(Debug, Default)]
pub struct TriggerSet {
    triggers: Vec<PositionTrigger>,
}

impl TriggerSet {
    pub fn add(&mut self, trigger: PositionTrigger) {
        self.triggers.push(trigger);
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&PositionTrigger> {
        self.triggers.iter().find(|t| t.name == name)
    }

    /// Fire every trigger containing `position`. Returns how many fired.
    pub fn update(&mut self, position: Vec3) -> usize {
        let mut count = 0;
        for t in &mut self.triggers {
            if t.fire_once && t.fired {
                continue;
            }
            if !t.contains(position) {
                continue;
            }
            t.fired = true;
            count += 1;
            let hit = TriggerHit {
                name: t.name.clone(),
                position,
            };
            match t.callback.as_mut() {
                Some(cb) => cb(&hit),
                None => log::info!(
                    "[Trigger] {} reached at ({:.2}, {:.2}, {:.2})",
                    t.name,
                    position.x,
                    position.y,
                    position.z
                ),
            }
        }
        count
    }
}
