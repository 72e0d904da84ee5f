//! Vehicle search → tag → last position, reported stage by stage.

use std::fmt;

use crate::api::{ApiError, VehicleApi};
use crate::state::SearchUpdate;
use crate::types::MarkerPosition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Search,
    Tag,
    Position,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Search => "busca",
            Stage::Tag => "tag",
            Stage::Position => "posición",
        })
    }
}

/// How a lookup ended.
#[derive(Debug, Clone, PartialEq)]
pub enum LocateOutcome {
    NotFound,
    NoTag { vehicle_id: i64 },
    Positioned { vehicle_id: i64, tag_id: i64, position: MarkerPosition },
    Failed { stage: Stage, error: ApiError },
}

/// Runs the three lookups in order. Every intermediate result is passed to
/// `report` as it becomes known; the first record of the search wins.
pub async fn locate<A, F>(api: &A, term: &str, mut report: F) -> LocateOutcome
where
    A: VehicleApi,
    F: FnMut(SearchUpdate),
{
    let vehicles = match api.search_vehicles(term).await {
        Ok(vehicles) => vehicles,
        Err(error) => {
            report(SearchUpdate::SearchFailed);
            return LocateOutcome::Failed { stage: Stage::Search, error };
        }
    };

    let Some(vehicle) = vehicles.into_iter().next() else {
        report(SearchUpdate::NotFound);
        return LocateOutcome::NotFound;
    };
    report(SearchUpdate::Located {
        reference: vehicle.display_reference(),
    });

    let tag_id = match api.vehicle_tag(vehicle.id).await {
        Ok(Some(tag)) => tag.id,
        Ok(None) => None,
        Err(error) => {
            report(SearchUpdate::TagFailed);
            return LocateOutcome::Failed { stage: Stage::Tag, error };
        }
    };
    let Some(tag_id) = tag_id else {
        report(SearchUpdate::NoTag);
        return LocateOutcome::NoTag { vehicle_id: vehicle.id };
    };

    match api.latest_position(tag_id).await {
        Ok(pos) => {
            let position = MarkerPosition::from(&pos);
            report(SearchUpdate::Positioned(position));
            LocateOutcome::Positioned {
                vehicle_id: vehicle.id,
                tag_id,
                position,
            }
        }
        Err(error) => {
            report(SearchUpdate::PositionFailed);
            LocateOutcome::Failed { stage: Stage::Position, error }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use futures::executor::block_on;

    use super::*;
    use crate::state::{ViewState, MSG_SEARCH_ERROR};
    use crate::types::{Position, Tag, Vehicle};

    #[derive(Default)]
    struct FakeApi {
        vehicles: Option<Vec<Vehicle>>,
        tags: HashMap<i64, Result<Option<Tag>, ApiError>>,
        positions: HashMap<i64, Position>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeApi {
        fn with_vehicle(id: i64, referencia: &str) -> Self {
            Self {
                vehicles: Some(vec![vehicle(id, referencia)]),
                ..Default::default()
            }
        }
    }

    fn vehicle(id: i64, referencia: &str) -> Vehicle {
        Vehicle {
            id,
            matricula: None,
            bastidor: None,
            referencia: Some(referencia.to_string()),
            estado: Some("activo".to_string()),
            tag_id: None,
        }
    }

    fn tag(id: i64) -> Tag {
        Tag { id: Some(id), ..Default::default() }
    }

    fn position(x: f64, y: f64) -> Position {
        Position { id: None, tag_id: None, x, y, zona_id: None, timestamp: None }
    }

    impl VehicleApi for FakeApi {
        async fn search_vehicles(&self, term: &str) -> Result<Vec<Vehicle>, ApiError> {
            self.calls.borrow_mut().push(format!("search:{term}"));
            self.vehicles
                .clone()
                .ok_or_else(|| ApiError::Request("offline".into()))
        }

        async fn vehicle_tag(&self, vehicle_id: i64) -> Result<Option<Tag>, ApiError> {
            self.calls.borrow_mut().push(format!("tag:{vehicle_id}"));
            self.tags.get(&vehicle_id).cloned().unwrap_or(Ok(None))
        }

        async fn latest_position(&self, tag_id: i64) -> Result<Position, ApiError> {
            self.calls.borrow_mut().push(format!("position:{tag_id}"));
            self.positions.get(&tag_id).cloned().ok_or(ApiError::Status {
                url: format!("/api/posiciones/tag/{tag_id}/ultima"),
                status: 404,
            })
        }
    }

    fn run(api: &FakeApi, term: &str) -> (LocateOutcome, Vec<SearchUpdate>) {
        let mut updates = Vec::new();
        let outcome = block_on(locate(api, term, |u| updates.push(u)));
        (outcome, updates)
    }

    #[test]
    fn resolves_vehicle_to_marker() {
        let mut api = FakeApi::with_vehicle(7, "ABC1234");
        api.tags.insert(7, Ok(Some(tag(42))));
        api.positions.insert(42, position(120.0, 80.0));

        let mut state = ViewState::new();
        let (ticket, term) = state.begin_search("ABC1234").unwrap();
        let outcome = block_on(locate(&api, &term, |u| {
            state.apply_search(ticket, u);
        }));

        assert_eq!(
            outcome,
            LocateOutcome::Positioned {
                vehicle_id: 7,
                tag_id: 42,
                position: MarkerPosition { x: 120.0, y: 80.0 },
            }
        );
        assert_eq!(state.result_text.as_deref(), Some("Vehículo \"ABC1234\" localizado."));
        assert_eq!(state.marker, Some(MarkerPosition { x: 120.0, y: 80.0 }));
        assert_eq!(*api.calls.borrow(), ["search:ABC1234", "tag:7", "position:42"]);
    }

    #[test]
    fn empty_result_stops_after_search() {
        let api = FakeApi { vehicles: Some(vec![]), ..Default::default() };
        let (outcome, updates) = run(&api, "nada");
        assert_eq!(outcome, LocateOutcome::NotFound);
        assert_eq!(updates, [SearchUpdate::NotFound]);
        assert_eq!(api.calls.borrow().len(), 1);
    }

    #[test]
    fn first_record_is_used() {
        let mut api = FakeApi {
            vehicles: Some(vec![vehicle(1, "PRIMEIRO"), vehicle(2, "SEGUNDO")]),
            ..Default::default()
        };
        api.tags.insert(1, Ok(None));
        let (outcome, updates) = run(&api, "o");
        assert_eq!(outcome, LocateOutcome::NoTag { vehicle_id: 1 });
        assert_eq!(
            updates,
            [SearchUpdate::Located { reference: "PRIMEIRO".into() }, SearchUpdate::NoTag]
        );
    }

    #[test]
    fn tag_without_id_counts_as_missing() {
        let mut api = FakeApi::with_vehicle(7, "ABC1234");
        api.tags.insert(7, Ok(Some(Tag::default())));
        let (outcome, _) = run(&api, "ABC1234");
        assert_eq!(outcome, LocateOutcome::NoTag { vehicle_id: 7 });
        assert!(!api.calls.borrow().iter().any(|c| c.starts_with("position")));
    }

    #[test]
    fn search_failure_is_reported() {
        let api = FakeApi::default();
        let mut state = ViewState::new();
        let (ticket, term) = state.begin_search("x").unwrap();
        let outcome = block_on(locate(&api, &term, |u| {
            state.apply_search(ticket, u);
        }));
        assert!(matches!(outcome, LocateOutcome::Failed { stage: Stage::Search, .. }));
        assert_eq!(state.result_text.as_deref(), Some(MSG_SEARCH_ERROR));
    }

    #[test]
    fn tag_failure_is_reported() {
        let mut api = FakeApi::with_vehicle(7, "ABC1234");
        api.tags.insert(7, Err(ApiError::Request("reset".into())));
        let (outcome, updates) = run(&api, "ABC1234");
        assert!(matches!(outcome, LocateOutcome::Failed { stage: Stage::Tag, .. }));
        assert_eq!(updates.last(), Some(&SearchUpdate::TagFailed));
    }

    #[test]
    fn missing_position_is_reported() {
        let mut api = FakeApi::with_vehicle(7, "ABC1234");
        api.tags.insert(7, Ok(Some(tag(42))));
        let (outcome, updates) = run(&api, "ABC1234");
        assert!(matches!(outcome, LocateOutcome::Failed { stage: Stage::Position, .. }));
        assert_eq!(updates.last(), Some(&SearchUpdate::PositionFailed));
    }
}
