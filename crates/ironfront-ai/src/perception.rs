//! Perception: target selection and line-of-sight policy.
//!
//! Generic over the caller's entity handle so the ECS stays out of this crate.

use glam::DVec3;

use ironfront_core::enums::Team;

/// A team-tagged entity visible to perception.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact<I> {
    pub id: I,
    pub team: Team,
    pub position: DVec3,
}

/// A capture point as seen by perception.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointCandidate<I> {
    pub id: I,
    pub owner: Team,
    pub position: DVec3,
    /// Radius of the point's volume.
    pub radius: f64,
}

/// One intersection along a line-of-sight ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit<I> {
    pub distance: f64,
    pub is_trigger: bool,
    /// Root of the hierarchy the collider belongs to, if any.
    pub root: Option<I>,
    /// Team tag of that hierarchy, if any.
    pub team: Option<Team>,
}

/// Ray used for a line-of-sight check.
#[derive(Debug, Clone, Copy)]
pub struct SightRay {
    pub origin: DVec3,
    pub direction: DVec3,
    pub length: f64,
}

/// Nearest hostile by squared distance, excluding `self_id` and same-team contacts.
pub fn nearest_hostile<I, C>(self_id: I, self_team: Team, self_pos: DVec3, contacts: C) -> Option<Contact<I>>
where
    I: Copy + PartialEq,
    C: IntoIterator<Item = Contact<I>>,
{
    contacts
        .into_iter()
        .filter(|c| c.id != self_id && self_team.is_hostile_to(c.team))
        .min_by(|a, b| {
            a.position
                .distance_squared(self_pos)
                .total_cmp(&b.position.distance_squared(self_pos))
        })
}

/// Nearest capture point overlapping a sphere of `search_radius` around
/// `self_pos` that `self_team` does not already control.
pub fn nearest_uncontrolled_point<I, P>(
    self_team: Team,
    self_pos: DVec3,
    search_radius: f64,
    points: P,
) -> Option<PointCandidate<I>>
where
    I: Copy,
    P: IntoIterator<Item = PointCandidate<I>>,
{
    points
        .into_iter()
        .filter(|p| p.owner != self_team)
        .filter(|p| p.position.distance(self_pos) <= search_radius + p.radius)
        .min_by(|a, b| {
            a.position
                .distance_squared(self_pos)
                .total_cmp(&b.position.distance_squared(self_pos))
        })
}

/// Build the sight ray from just ahead of the muzzle to a point above the target's base.
///
/// Returns None when the two points coincide.
pub fn sight_ray(
    muzzle: DVec3,
    barrel_dir: DVec3,
    muzzle_offset: f64,
    target_base: DVec3,
    target_height: f64,
    max_range: f64,
) -> Option<SightRay> {
    let origin = muzzle + barrel_dir * muzzle_offset;
    let aim = target_base + DVec3::Z * target_height;
    let offset = aim - origin;
    let direction = offset.try_normalize()?;
    Some(SightRay {
        origin,
        direction,
        length: offset.length().min(max_range),
    })
}

/// Evaluate a ray's hit list in distance order.
///
/// Triggers and the shooter's own hierarchy are skipped. Reaching the target
/// clears the check, as does any other team-tagged hierarchy that is not on
/// the shooter's side. Allies are looked through. Untagged scenery blocks.
/// An empty list is clear.
pub fn evaluate_sight<I>(hits: &mut [RayHit<I>], shooter: I, shooter_team: Team, target: I) -> bool
where
    I: Copy + PartialEq,
{
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    for hit in hits.iter() {
        if hit.is_trigger || hit.root == Some(shooter) {
            continue;
        }
        if hit.root == Some(target) {
            return true;
        }
        match hit.team {
            Some(team) if team == shooter_team => continue,
            Some(_) => return true,
            None => return false,
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(id: u32, team: Team, x: f64, y: f64) -> Contact<u32> {
        Contact {
            id,
            team,
            position: DVec3::new(x, y, 0.0),
        }
    }

    fn hit(distance: f64, root: Option<u32>, team: Option<Team>) -> RayHit<u32> {
        RayHit {
            distance,
            is_trigger: false,
            root,
            team,
        }
    }

    #[test]
    fn test_nearest_hostile_skips_self_and_allies() {
        let contacts = vec![
            contact(0, Team::Friendly, 0.0, 0.0),
            contact(1, Team::Friendly, 1.0, 0.0),
            contact(2, Team::Enemy, 30.0, 0.0),
            contact(3, Team::Enemy, 0.0, 20.0),
            contact(4, Team::Neutral, 2.0, 2.0),
        ];
        let found = nearest_hostile(0, Team::Friendly, DVec3::ZERO, contacts).unwrap();
        assert_eq!(found.id, 3);
    }

    #[test]
    fn test_nearest_hostile_none_without_enemies() {
        let contacts = vec![contact(1, Team::Friendly, 5.0, 0.0), contact(2, Team::Neutral, 1.0, 0.0)];
        assert!(nearest_hostile(0, Team::Friendly, DVec3::ZERO, contacts).is_none());
    }

    #[test]
    fn test_neutral_sees_no_hostiles() {
        let contacts = vec![contact(1, Team::Enemy, 5.0, 0.0), contact(2, Team::Friendly, 1.0, 0.0)];
        assert!(nearest_hostile(0, Team::Neutral, DVec3::ZERO, contacts).is_none());
    }

    #[test]
    fn test_uncontrolled_point_excludes_own_and_far() {
        let points = vec![
            PointCandidate { id: 'a', owner: Team::Friendly, position: DVec3::new(5.0, 0.0, 0.0), radius: 10.0 },
            PointCandidate { id: 'b', owner: Team::Neutral, position: DVec3::new(80.0, 0.0, 0.0), radius: 10.0 },
            PointCandidate { id: 'c', owner: Team::Enemy, position: DVec3::new(0.0, 60.0, 0.0), radius: 10.0 },
            PointCandidate { id: 'd', owner: Team::Neutral, position: DVec3::new(0.0, 500.0, 0.0), radius: 10.0 },
        ];
        let found = nearest_uncontrolled_point(Team::Friendly, DVec3::ZERO, 100.0, points).unwrap();
        assert_eq!(found.id, 'c');
    }

    #[test]
    fn test_point_volume_counts_toward_overlap() {
        let points = vec![PointCandidate {
            id: 1u8,
            owner: Team::Neutral,
            position: DVec3::new(105.0, 0.0, 0.0),
            radius: 10.0,
        }];
        assert!(nearest_uncontrolled_point(Team::Enemy, DVec3::ZERO, 100.0, points).is_some());
    }

    #[test]
    fn test_sight_empty_hits_is_clear() {
        let mut hits: Vec<RayHit<u32>> = Vec::new();
        assert!(evaluate_sight(&mut hits, 0, Team::Friendly, 9));
    }

    #[test]
    fn test_sight_unsorted_obstacle_before_target_blocks() {
        let mut hits = vec![hit(50.0, Some(9), Some(Team::Enemy)), hit(20.0, None, None)];
        assert!(!evaluate_sight(&mut hits, 0, Team::Friendly, 9));
    }

    #[test]
    fn test_sight_skips_own_hull_and_triggers() {
        let mut hits = vec![
            hit(0.1, Some(0), Some(Team::Friendly)),
            RayHit { distance: 5.0, is_trigger: true, root: None, team: None },
            hit(40.0, Some(9), Some(Team::Enemy)),
        ];
        assert!(evaluate_sight(&mut hits, 0, Team::Friendly, 9));
    }

    #[test]
    fn test_sight_allies_do_not_block() {
        let mut hits = vec![hit(10.0, Some(3), Some(Team::Friendly)), hit(40.0, Some(9), Some(Team::Enemy))];
        assert!(evaluate_sight(&mut hits, 0, Team::Friendly, 9));
    }

    #[test]
    fn test_sight_other_hostile_in_front_is_clear() {
        let mut hits = vec![hit(10.0, Some(7), Some(Team::Enemy)), hit(15.0, None, None)];
        assert!(evaluate_sight(&mut hits, 0, Team::Friendly, 9));
    }

    #[test]
    fn test_sight_neutral_hierarchy_is_clear() {
        let mut hits = vec![hit(10.0, Some(5), Some(Team::Neutral)), hit(40.0, Some(9), Some(Team::Enemy))];
        assert!(evaluate_sight(&mut hits, 0, Team::Friendly, 9));
    }

    #[test]
    fn test_sight_untagged_scenery_before_neutral_blocks() {
        let mut hits = vec![hit(10.0, Some(5), Some(Team::Neutral)), hit(4.0, Some(6), None)];
        assert!(!evaluate_sight(&mut hits, 0, Team::Friendly, 9));
    }

    #[test]
    fn test_sight_ray_geometry() {
        let ray = sight_ray(DVec3::new(0.0, 0.0, 2.0), DVec3::Y, 0.5, DVec3::new(0.0, 50.0, 0.0), 2.0, 200.0)
            .unwrap();
        assert!((ray.origin.y - 0.5).abs() < 1e-12);
        assert!((ray.length - 49.5).abs() < 1e-9);
        assert!((ray.direction.length() - 1.0).abs() < 1e-12);

        let capped = sight_ray(DVec3::ZERO, DVec3::Y, 0.0, DVec3::new(0.0, 500.0, 0.0), 0.0, 100.0).unwrap();
        assert_eq!(capped.length, 100.0);
    }
}
