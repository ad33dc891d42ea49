//! Builders for hand-crafted snapshots in tests.

use crate::config::BoardTopology;
use crate::kinds::{DevCardKind, ResourceKind, Terrain};
use crate::snapshot::{Bank, Board, Building, CountMap, Edge, GameSnapshot, GameState, Node, Player, Tile};

const CHITS: [i64; 18] = [5, 2, 6, 3, 8, 10, 9, 12, 11, 4, 8, 10, 9, 4, 5, 6, 3, 11];
const DESERT_TILE: usize = 9;
const PORTS: [&str; 9] = [
    "ThreeToOne",
    "Lumber",
    "ThreeToOne",
    "Ore",
    "Wheat",
    "ThreeToOne",
    "Sheep",
    "ThreeToOne",
    "Brick",
];

fn zeroed<'a>(names: impl Iterator<Item = &'a str>) -> CountMap {
    names.map(|name| (name.to_string(), 0)).collect()
}

/// A freshly seated player: no cards, full supply of pieces.
pub fn fresh_player() -> Player {
    let dev_names = || DevCardKind::ALL.iter().map(|d| d.name());
    Player {
        victory_points: 0,
        num_knights_played: 0,
        num_unplaced_cities: 4,
        num_unplaced_settlements: 5,
        num_unplaced_roads: 15,
        resource_cards: zeroed(ResourceKind::ALL.iter().map(|r| r.name())),
        development_cards: zeroed(dev_names()),
        development_cards_drawn_this_turn: zeroed(dev_names()),
        longest_road: false,
        largest_army: false,
    }
}

/// Builds a valid reference-board snapshot; every setter overrides one detail.
pub struct SnapshotBuilder {
    snapshot: GameSnapshot,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::with_topology(BoardTopology::REFERENCE)
    }

    pub fn with_topology(topology: BoardTopology) -> Self {
        let mut chits = CHITS.iter().cycle();
        let tiles = (0..topology.tiles)
            .map(|i| {
                if i == DESERT_TILE {
                    Tile {
                        terrain: Terrain::Desert.name().to_string(),
                        chit: None,
                        has_robber: true,
                    }
                } else {
                    Tile {
                        terrain: Terrain::ALL[1 + i % 5].name().to_string(),
                        chit: chits.next().copied(),
                        has_robber: false,
                    }
                }
            })
            .collect();

        let board = Board {
            tiles,
            edges: (0..topology.edges)
                .map(|position| Edge {
                    position,
                    building: None,
                })
                .collect(),
            nodes: (0..topology.nodes)
                .map(|position| Node {
                    position,
                    building: None,
                })
                .collect(),
            ports: PORTS
                .iter()
                .cycle()
                .take(topology.ports)
                .map(|p| p.to_string())
                .collect(),
        };

        let mut deck = Vec::new();
        for (card, copies) in [
            (DevCardKind::Knight, 14),
            (DevCardKind::RoadBuilding, 2),
            (DevCardKind::YearOfPlenty, 2),
            (DevCardKind::Monopoly, 2),
            (DevCardKind::VictoryPoint, 5),
        ] {
            deck.extend(std::iter::repeat(card.name().to_string()).take(copies));
        }

        let bank = Bank {
            resource_cards: ResourceKind::ALL
                .iter()
                .map(|r| (r.name().to_string(), 19))
                .collect(),
            development_cards: deck,
            development_card_pointer: None,
        };

        Self {
            snapshot: GameSnapshot {
                last_action_successful: true,
                game: GameState {
                    board,
                    bank,
                    players: (0..topology.players).map(|_| fresh_player()).collect(),
                    current_player_id: 0,
                    previous_dice_roll: None,
                    game_ended: false,
                },
            },
        }
    }

    pub fn current_player(mut self, id: usize) -> Self {
        self.snapshot.game.current_player_id = id;
        self
    }

    pub fn dice(mut self, roll: i64) -> Self {
        self.snapshot.game.previous_dice_roll = Some(roll);
        self
    }

    pub fn game_ended(mut self, ended: bool) -> Self {
        self.snapshot.game.game_ended = ended;
        self
    }

    pub fn last_action_successful(mut self, ok: bool) -> Self {
        self.snapshot.last_action_successful = ok;
        self
    }

    pub fn tile(mut self, index: usize, terrain: &str, chit: Option<i64>) -> Self {
        let tile = &mut self.snapshot.game.board.tiles[index];
        tile.terrain = terrain.to_string();
        tile.chit = chit;
        self
    }

    pub fn port(mut self, index: usize, kind: &str) -> Self {
        self.snapshot.game.board.ports[index] = kind.to_string();
        self
    }

    pub fn road(mut self, edge: usize, owner: usize) -> Self {
        self.snapshot.game.board.edges[edge].building = Some(Building::Road(edge, owner));
        self
    }

    pub fn settlement(mut self, node: usize, owner: usize) -> Self {
        self.snapshot.game.board.nodes[node].building = Some(Building::Settlement(node, owner));
        self
    }

    pub fn city(mut self, node: usize, owner: usize) -> Self {
        self.snapshot.game.board.nodes[node].building = Some(Building::City(node, owner));
        self
    }

    pub fn resource(mut self, player: usize, kind: ResourceKind, amount: i64) -> Self {
        self.snapshot.game.players[player]
            .resource_cards
            .insert(kind.name().to_string(), amount);
        self
    }

    pub fn dev_card(mut self, player: usize, kind: DevCardKind, amount: i64) -> Self {
        self.snapshot.game.players[player]
            .development_cards
            .insert(kind.name().to_string(), amount);
        self
    }

    pub fn drawn_this_turn(mut self, player: usize, kind: DevCardKind, amount: i64) -> Self {
        self.snapshot.game.players[player]
            .development_cards_drawn_this_turn
            .insert(kind.name().to_string(), amount);
        self
    }

    /// Arbitrary edits to one player.
    pub fn with_player(mut self, player: usize, edit: impl FnOnce(&mut Player)) -> Self {
        edit(&mut self.snapshot.game.players[player]);
        self
    }

    pub fn build(self) -> GameSnapshot {
        self.snapshot
    }
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_matches_reference_topology() {
        let snapshot = SnapshotBuilder::default().build();
        let game = &snapshot.game;
        assert_eq!(game.board.tiles.len(), 19);
        assert_eq!(game.board.edges.len(), 72);
        assert_eq!(game.board.nodes.len(), 54);
        assert_eq!(game.board.ports.len(), 9);
        assert_eq!(game.players.len(), 4);
        assert_eq!(game.bank.development_deck_size(), 25);
        assert_eq!(game.board.tiles[DESERT_TILE].terrain, "Desert");
    }

    #[test]
    fn test_builder_setters() {
        let snapshot = SnapshotBuilder::new()
            .road(10, 3)
            .city(20, 1)
            .resource(1, ResourceKind::Ore, 3)
            .build();
        assert_eq!(snapshot.game.board.edges[10].building, Some(Building::Road(10, 3)));
        assert_eq!(snapshot.game.board.nodes[20].building, Some(Building::City(20, 1)));
        assert_eq!(snapshot.game.players[1].resource_cards["Ore"], 3);
    }
}
