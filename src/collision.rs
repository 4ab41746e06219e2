//! Category bitmasks, contact detection and contact resolution.
//!
//! Detection finds pairs of bodies whose masks ask to be told about each
//! other and whose shapes overlap. Resolution is a pure lookup of the pair's
//! categories in [`CONTACT_RULES`].

use glam::Vec2;

use crate::entities::EntityId;

/// Collision category of an entity. Fixed for the entity's whole life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Projectile,
    Enemy,
    Player,
}

impl Category {
    pub const fn bits(self) -> u32 {
        match self {
            Category::Projectile => 1 << 0,
            Category::Enemy => 1 << 1,
            Category::Player => 1 << 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { half_extents: Vec2 },
}

/// Physics-facing view of an entity for one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub id: EntityId,
    pub category: Category,
    /// Categories this body wants contact notifications for
    pub contact_test: u32,
    /// Where the body was at the start of the step
    pub previous: Vec2,
    pub position: Vec2,
    pub shape: Shape,
}

impl Body {
    pub fn projectile(id: EntityId, position: Vec2, radius: f32) -> Self {
        Self {
            id,
            category: Category::Projectile,
            contact_test: Category::Enemy.bits(),
            previous: position,
            position,
            shape: Shape::Circle { radius },
        }
    }

    pub fn enemy(id: EntityId, position: Vec2, size: Vec2) -> Self {
        Self {
            id,
            category: Category::Enemy,
            contact_test: Category::Projectile.bits(),
            previous: position,
            position,
            shape: Shape::Rect {
                half_extents: size / 2.0,
            },
        }
    }

    /// Sets the start-of-step position so overlap is tested along the path
    /// travelled this step, not just at its end.
    pub fn swept_from(mut self, previous: Vec2) -> Self {
        self.previous = previous;
        self
    }

    /// Either side asking to hear about the other is enough.
    pub fn tests_contact_with(&self, other: &Body) -> bool {
        self.category.bits() & other.contact_test != 0
            || other.category.bits() & self.contact_test != 0
    }

    /// True if the bodies touched at any point during the step.
    ///
    /// Works in `other`'s frame: `self` sweeps from its relative start
    /// offset to its relative end offset against `other` held at the origin.
    pub fn overlaps(&self, other: &Body) -> bool {
        let from = self.previous - other.previous;
        let to = self.position - other.position;
        if from == to {
            return self.overlaps_at_rest(other);
        }

        match (self.shape, other.shape) {
            (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
                segment_within_circle(from, to, ra + rb)
            }
            (Shape::Rect { half_extents: ha }, Shape::Rect { half_extents: hb }) => {
                segment_hits_box(from, to, ha + hb)
            }
            (Shape::Circle { radius }, Shape::Rect { half_extents })
            | (Shape::Rect { half_extents }, Shape::Circle { radius }) => {
                segment_hits_box(from, to, half_extents + Vec2::splat(radius))
            }
        }
    }

    fn overlaps_at_rest(&self, other: &Body) -> bool {
        match (self.shape, other.shape) {
            (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
                self.position.distance_squared(other.position) <= (ra + rb) * (ra + rb)
            }
            (Shape::Rect { half_extents: ha }, Shape::Rect { half_extents: hb }) => {
                let delta = (self.position - other.position).abs();
                delta.x <= ha.x + hb.x && delta.y <= ha.y + hb.y
            }
            (Shape::Circle { radius }, Shape::Rect { half_extents }) => {
                circle_overlaps_rect(self.position, radius, other.position, half_extents)
            }
            (Shape::Rect { half_extents }, Shape::Circle { radius }) => {
                circle_overlaps_rect(other.position, radius, self.position, half_extents)
            }
        }
    }
}

fn circle_overlaps_rect(center: Vec2, radius: f32, rect_center: Vec2, half_extents: Vec2) -> bool {
    let closest = center.clamp(rect_center - half_extents, rect_center + half_extents);
    center.distance_squared(closest) <= radius * radius
}

/// Does the segment `from -> to` come within `radius` of the origin?
fn segment_within_circle(from: Vec2, to: Vec2, radius: f32) -> bool {
    let delta = to - from;
    let len_sq = delta.length_squared();
    let t = if len_sq > 0.0 {
        (-from.dot(delta) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (from + delta * t).length_squared() <= radius * radius
}

/// Slab test of the segment `from -> to` against an origin-centered box.
fn segment_hits_box(from: Vec2, to: Vec2, half_extents: Vec2) -> bool {
    let delta = to - from;
    let mut t_enter = 0.0f32;
    let mut t_exit = 1.0f32;

    for axis in 0..2 {
        let start = from[axis];
        let step = delta[axis];
        let half = half_extents[axis];

        if step == 0.0 {
            if start.abs() > half {
                return false;
            }
            continue;
        }

        let (t0, t1) = ((-half - start) / step, (half - start) / step);
        t_enter = t_enter.max(t0.min(t1));
        t_exit = t_exit.min(t0.max(t1));
        if t_enter > t_exit {
            return false;
        }
    }
    true
}

/// Two bodies that began touching.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub a: Body,
    pub b: Body,
}

/// Finds every overlapping pair whose masks request a contact event.
/// Pairs are reported in the order the bodies appear in `bodies`.
pub fn detect_contacts(bodies: &[Body]) -> Vec<Contact> {
    let mut contacts = Vec::new();
    for (i, a) in bodies.iter().enumerate() {
        for b in &bodies[i + 1..] {
            if a.tests_contact_with(b) && a.overlaps(b) {
                contacts.push(Contact { a: *a, b: *b });
            }
        }
    }
    contacts
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// Destroy both bodies, leave an explosion where the second one was and score.
    DestroyBoth,
}

/// One row of the collision table. `first` always has the lower category bit.
#[derive(Debug, Clone, Copy)]
pub struct ContactRule {
    pub first: Category,
    pub second: Category,
    pub outcome: ContactOutcome,
}

/// Every category pairing that does something. Anything else is ignored.
pub const CONTACT_RULES: &[ContactRule] = &[ContactRule {
    first: Category::Projectile,
    second: Category::Enemy,
    outcome: ContactOutcome::DestroyBoth,
}];

/// What a contact resolved to, with the two bodies put in rule order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub outcome: ContactOutcome,
    pub first: Body,
    pub second: Body,
}

/// Classifies a contact. The bodies may arrive in either order; they are
/// sorted by category bit before the table lookup.
pub fn resolve_contact(a: &Body, b: &Body) -> Option<Resolution> {
    let (first, second) = if a.category.bits() <= b.category.bits() {
        (a, b)
    } else {
        (b, a)
    };

    CONTACT_RULES
        .iter()
        .find(|rule| {
            first.category.bits() & rule.first.bits() != 0
                && second.category.bits() & rule.second.bits() != 0
        })
        .map(|rule| Resolution {
            outcome: rule.outcome,
            first: *first,
            second: *second,
        })
}
