//! Line of sight and targeting integration tests

use hexfire::battle::*;
use hexfire::core::config::EngineConfig;
use hexfire::core::types::Side;

#[test]
fn test_hilltop_between_clear_hexes_blocks() {
    let mut map = BattleMap::new(6, 3);
    map.set_terrain(HexCoord::new(2, 1), TerrainType::Hilltop).unwrap();
    let shooter = HexCoord::new(1, 1);
    let target = HexCoord::new(3, 1);

    let result = compute_los(&map, shooter, target).unwrap();
    assert!(!result.has_los);
    assert_eq!(result.blocked_by, Some(HexCoord::new(2, 1)));
    assert_eq!(result.intervening, vec![HexCoord::new(2, 1)]);
}

#[test]
fn test_hilltop_shooter_still_blocked_by_hilltop() {
    let mut map = BattleMap::new(6, 3);
    map.set_terrain(HexCoord::new(2, 1), TerrainType::Hilltop).unwrap();
    map.set_terrain(HexCoord::new(1, 1), TerrainType::Hilltop).unwrap();

    // Firing value 2 against intervening 3
    let result = compute_los(&map, HexCoord::new(1, 1), HexCoord::new(3, 1)).unwrap();
    assert!(!result.has_los);

    // A firing value of 3 or more would clear it
    let intervening = TerrainType::Hilltop.los_value(LosContext::Intervening);
    assert!(obstructs(intervening, 2, 0));
    assert!(!obstructs(intervening, 3, 0));
    assert!(!obstructs(intervening, 4, 0));
}

#[test]
fn test_slope_to_slope_sees_along_ridge() {
    let mut map = BattleMap::new(6, 3);
    map.set_terrain(HexCoord::new(1, 1), TerrainType::Slope).unwrap();
    map.set_terrain(HexCoord::new(2, 1), TerrainType::Slope).unwrap();
    map.set_terrain(HexCoord::new(3, 1), TerrainType::Slope).unwrap();

    // Slope intervening 1 does not beat slope firing 1
    assert!(compute_los(&map, HexCoord::new(1, 1), HexCoord::new(3, 1)).unwrap().has_los);
    // Between two clear hexes it does
    assert!(!compute_los(&map, HexCoord::new(0, 1), HexCoord::new(4, 1)).unwrap().has_los);
}

#[test]
fn test_symmetry_across_mixed_terrain() {
    let mut map = BattleMap::new(9, 9);
    let features = [
        (HexCoord::new(4, 4), TerrainType::Hilltop),
        (HexCoord::new(2, 5), TerrainType::Forest),
        (HexCoord::new(6, 2), TerrainType::City),
        (HexCoord::new(5, 5), TerrainType::Slope),
        (HexCoord::new(3, 3), TerrainType::Slope),
    ];
    for (coord, terrain) in features {
        map.set_terrain(coord, terrain).unwrap();
    }

    let mut cache = LosCache::new();
    let coords: Vec<HexCoord> = map.coords().collect();
    for a in &coords {
        for b in &coords {
            let forward = compute_los(&map, *a, *b).unwrap();
            let backward = calculate_los(&map, &mut cache, *b, *a).unwrap();
            assert_eq!(forward.has_los, backward.has_los, "{} <-> {}", a, b);
        }
    }
}

#[test]
fn test_range_filter_before_sight() {
    let map = BattleMap::new(10, 10);
    let mut cache = LosCache::new();

    // Heavy tank: range 2
    let shooter = Unit::new(UnitType::HeavyTank, Side::Blue, HexCoord::new(2, 2));
    let at_two = Unit::new(UnitType::Infantry, Side::Red, HexCoord::new(4, 2));
    let at_three = Unit::new(UnitType::Infantry, Side::Red, HexCoord::new(5, 2));
    let units = vec![shooter.clone(), at_two.clone(), at_three.clone()];

    let targets = valid_targets(&map, &mut cache, &shooter, &units).unwrap();
    let ids: Vec<UnitId> = targets.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![at_two.id]);
    // Out-of-range candidates never reach the sight check
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_adjacent_enemy_always_targetable() {
    let mut map = BattleMap::new(10, 10);
    map.set_terrain(HexCoord::new(3, 2), TerrainType::Fortress).unwrap();
    map.set_terrain(HexCoord::new(2, 2), TerrainType::Hilltop).unwrap();
    let mut cache = LosCache::new();

    let shooter = Unit::new(UnitType::HeavyTank, Side::Blue, HexCoord::new(2, 2));
    let adjacent = Unit::new(UnitType::Infantry, Side::Red, HexCoord::new(3, 2));
    let units = vec![adjacent.clone()];

    let targets = valid_targets(&map, &mut cache, &shooter, &units).unwrap();
    assert_eq!(targets.len(), 1);
    assert!(cache.is_empty());
}

#[test]
fn test_enemy_behind_forest_excluded() {
    let mut map = BattleMap::new(10, 10);
    map.set_terrain(HexCoord::new(3, 2), TerrainType::Forest).unwrap();
    let mut cache = LosCache::new();

    let shooter = Unit::new(UnitType::HeavyTank, Side::Blue, HexCoord::new(2, 2));
    let hidden = Unit::new(UnitType::Infantry, Side::Red, HexCoord::new(4, 2));
    let open = Unit::new(UnitType::Infantry, Side::Red, HexCoord::new(2, 4));
    let units = vec![hidden, open.clone()];

    let targets = valid_targets(&map, &mut cache, &shooter, &units).unwrap();
    let ids: Vec<UnitId> = targets.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![open.id]);
}

#[test]
fn test_sight_unchanged_by_unit_movement() {
    let mut map = BattleMap::new(10, 10);
    map.set_terrain(HexCoord::new(5, 5), TerrainType::Forest).unwrap();
    let blue = Unit::new(UnitType::LightTank, Side::Blue, HexCoord::new(3, 5));
    let red = Unit::new(UnitType::Infantry, Side::Red, HexCoord::new(7, 5));
    let blue_id = blue.id;

    let mut state = BattleState::new(map, vec![blue, red], EngineConfig::default()).unwrap();
    let before = state.visible_hexes(blue_id).unwrap();
    let cached = state.los_cache().len();
    assert!(cached > 0);

    state.move_unit(blue_id, HexCoord::new(3, 6)).unwrap().unwrap();
    assert_eq!(state.los_cache().len(), cached);

    // Sight from the old hex is unchanged
    let from_old = visible_from(&state.map, &mut LosCache::new(), HexCoord::new(3, 5)).unwrap();
    assert_eq!(before, from_old);
}

#[test]
fn test_rubble_reopens_sight() {
    let mut map = BattleMap::new(8, 3);
    map.set_terrain(HexCoord::new(3, 1), TerrainType::City).unwrap();
    let mut state = BattleState::new(map, Vec::new(), EngineConfig::default()).unwrap();

    let (a, b) = (HexCoord::new(1, 1), HexCoord::new(5, 1));
    assert!(!state.los_between(a, b).unwrap().has_los);
    state.rubble_hex(HexCoord::new(3, 1)).unwrap();
    assert!(state.los_between(a, b).unwrap().has_los);
}
