//! Integration tests for customs-engine.

use customs_core::{BoothId, Lane, PassengerId, PlaneId, Tick, TimeGrid};
use customs_schedule::{LaneSchedule, ServerSchedule};

use crate::customs::ServicedPassengers;
use crate::{
    Customs, MemoryRoster, NoopObserver, ParallelServer, Passenger, Plane, ServiceAgent,
    SimObserver, Simulation,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn grid10() -> TimeGrid {
    TimeGrid::new(10).unwrap()
}

fn flat_schedule(dom: (u32, u32), frn: (u32, u32)) -> ServerSchedule {
    ServerSchedule::new(vec![
        LaneSchedule::flat(Lane::Domestic, dom.0, dom.1),
        LaneSchedule::flat(Lane::Foreign, frn.0, frn.1),
    ])
    .unwrap()
}

fn pax(id: u32, lane: Lane, at: Tick, service: u32) -> Passenger {
    Passenger::new(PassengerId(id), "XX100", lane, at, service)
}

fn plane(id: u32, at: Tick, passengers: Vec<Passenger>) -> Plane {
    Plane::new(PlaneId(id), format!("XX{id}"), "LHR", at, passengers)
}

/// Observer that keeps a copy of every serviced passenger.
#[derive(Default)]
struct CollectObserver {
    serviced: Vec<Passenger>,
}

impl SimObserver for CollectObserver {
    fn on_serviced(&mut self, _now: Tick, serviced: &[Passenger]) {
        self.serviced.extend_from_slice(serviced);
    }
}

/// Run a full day over an in-memory roster and return the serviced log.
fn run_day(
    schedule: ServerSchedule,
    planes: Vec<Plane>,
    grid: TimeGrid,
) -> (crate::SimSummary, Vec<Passenger>, Simulation<MemoryRoster>) {
    let mut sim = Simulation::new(grid, schedule, MemoryRoster::new(planes), 1);
    let mut obs = CollectObserver::default();
    let summary = sim.run(&mut obs).unwrap();
    (summary, obs.serviced, sim)
}

fn waits(serviced: &[Passenger]) -> Vec<u32> {
    serviced.iter().filter_map(|p| p.wait_ticks()).collect()
}

// ── Booth state machine ───────────────────────────────────────────────────────

mod booth_tests {
    use super::*;

    fn booth() -> (ServiceAgent, ServicedPassengers) {
        let mut b = ServiceAgent::new(BoothId(0), Lane::Domestic, 1);
        b.online = true;
        (b, ServicedPassengers::default())
    }

    #[test]
    fn pickup_fixes_departure_time() {
        let (mut b, mut sink) = booth();
        b.enqueue(pax(1, Lane::Domestic, Tick(0), 5));
        b.serve(Tick(0), &mut sink);
        assert!(b.is_serving());
        assert_eq!(b.current().unwrap().departure_time, Some(Tick(5)));
    }

    #[test]
    fn completes_exactly_on_departure_tick() {
        let (mut b, mut sink) = booth();
        b.enqueue(pax(1, Lane::Domestic, Tick(0), 5));
        b.serve(Tick(0), &mut sink);
        b.serve(Tick(3), &mut sink); // mid-transaction
        assert!(b.is_serving());
        b.serve(Tick(5), &mut sink);
        assert!(!b.is_serving());
        assert_eq!(sink.total_served(), 1);
        assert!(sink.drain()[0].processed);
    }

    #[test]
    fn no_pickup_on_the_completion_tick() {
        let (mut b, mut sink) = booth();
        b.enqueue(pax(1, Lane::Domestic, Tick(0), 5));
        b.serve(Tick(0), &mut sink);
        b.enqueue(pax(2, Lane::Domestic, Tick(0), 5));
        b.serve(Tick(5), &mut sink); // completes #1, must not pick up #2
        assert!(!b.is_serving());
        assert_eq!(b.queue_len(), 1);
        b.serve(Tick(6), &mut sink);
        assert!(b.is_serving());
        assert_eq!(b.current().unwrap().id, PassengerId(2));
        assert_eq!(b.current().unwrap().departure_time, Some(Tick(11)));
    }

    #[test]
    fn going_offline_never_preempts() {
        let (mut b, mut sink) = booth();
        b.enqueue(pax(1, Lane::Domestic, Tick(0), 5));
        b.serve(Tick(0), &mut sink);
        b.online = false;
        b.serve(Tick(3), &mut sink);
        assert!(b.is_serving());
        b.serve(Tick(5), &mut sink);
        assert_eq!(sink.total_served(), 1);
    }

    #[test]
    fn offline_booth_leaves_its_queue_stuck() {
        let (mut b, mut sink) = booth();
        b.enqueue(pax(1, Lane::Domestic, Tick(0), 5));
        b.online = false;
        for now in 0..10 {
            b.serve(Tick(now), &mut sink);
        }
        assert!(!b.is_serving(), "a dark booth never starts a transaction");
        assert_eq!(b.queue_len(), 1);
        assert_eq!(sink.total_served(), 0);

        // Staffed again, the stuck passenger is picked up normally.
        b.online = true;
        b.serve(Tick(10), &mut sink);
        assert!(b.is_serving());
        assert_eq!(b.current().unwrap().departure_time, Some(Tick(15)));
    }

    #[test]
    fn fully_dark_booth_does_nothing() {
        let (mut b, mut sink) = booth();
        b.online = false;
        b.serve(Tick(0), &mut sink);
        assert!(!b.is_serving());
        assert_eq!(sink.total_served(), 0);
    }

    #[test]
    fn successive_completions_are_more_than_service_time_apart() {
        let (mut b, mut sink) = booth();
        b.enqueue(pax(1, Lane::Domestic, Tick(0), 1));
        for now in 0..6 {
            b.serve(Tick(now), &mut sink);
            if b.has_space() && sink.total_served() == 1 && b.queue_len() == 0 && !b.is_serving() {
                b.enqueue(pax(2, Lane::Domestic, Tick(0), 1));
            }
        }
        let done = sink.drain();
        let deps: Vec<Tick> = done.iter().filter_map(|p| p.departure_time).collect();
        assert_eq!(deps, vec![Tick(1), Tick(3)], "completion, one-tick gap, completion");
    }
}

// ── Utilization accounting ────────────────────────────────────────────────────

mod utilization_tests {
    use super::*;

    /// 10-tick hours keep the traces small.
    const TPH: u32 = 10;

    fn booth() -> (ServiceAgent, ServicedPassengers) {
        let mut b = ServiceAgent::new(BoothId(0), Lane::Domestic, 1);
        b.online = true;
        (b, ServicedPassengers::default())
    }

    #[test]
    fn busy_whole_hour_snapshots_one() {
        let (mut b, mut sink) = booth();
        b.enqueue(pax(1, Lane::Domestic, Tick(0), 20)); // outlasts the hour
        for now in 0..TPH {
            b.serve(Tick(now), &mut sink);
            b.record_utilization(Tick(now), TPH);
        }
        assert_eq!(b.hourly_series().get(&0), Some(&1.0));
    }

    #[test]
    fn idle_online_hour_snapshots_zero() {
        let (mut b, mut sink) = booth();
        for now in 0..TPH {
            b.serve(Tick(now), &mut sink);
            b.record_utilization(Tick(now), TPH);
        }
        assert_eq!(b.hourly_series().get(&0), Some(&0.0));
    }

    #[test]
    fn offline_hour_produces_no_snapshot() {
        let (mut b, mut sink) = booth();
        b.online = false;
        for now in 0..TPH {
            b.serve(Tick(now), &mut sink);
            b.record_utilization(Tick(now), TPH);
        }
        assert!(b.hourly_series().is_empty());
    }

    #[test]
    fn half_busy_hour_lands_in_the_middle() {
        let (mut b, mut sink) = booth();
        b.enqueue(pax(1, Lane::Domestic, Tick(0), 5));
        for now in 0..TPH {
            b.serve(Tick(now), &mut sink);
            b.record_utilization(Tick(now), TPH);
        }
        let snap = *b.hourly_series().get(&0).unwrap();
        assert!((0.3..0.6).contains(&snap), "snapshot {snap} not near half");
    }

    #[test]
    fn snapshots_stay_within_unit_interval_across_hours() {
        let (mut b, mut sink) = booth();
        for now in 0..TPH * 3 {
            if now % 7 == 0 && b.has_space() {
                b.enqueue(pax(now, Lane::Domestic, Tick(now), 3));
            }
            b.serve(Tick(now), &mut sink);
            b.record_utilization(Tick(now), TPH);
        }
        assert_eq!(b.hourly_series().len(), 3);
        for (&hour, &u) in b.hourly_series() {
            assert!((0.0..=1.0).contains(&u), "hour {hour}: {u} outside [0, 1]");
        }
    }
}

// ── Block dispatch state ──────────────────────────────────────────────────────

mod block_tests {
    use super::*;

    #[test]
    fn min_queue_ties_break_to_first() {
        let mut block = ParallelServer::new(Lane::Domestic, 3, 1);
        block.set_online_prefix(3);
        block.update_state();
        assert_eq!(block.min_queue(), Some(0));
        assert!(block.has_space());
        assert_eq!(block.online_count(), 3);
    }

    #[test]
    fn min_queue_skips_offline_and_full_booths() {
        let mut block = ParallelServer::new(Lane::Domestic, 3, 1);
        block.set_online_prefix(3);
        block.booths_mut()[0].online = false;
        block.enqueue_at(1, pax(1, Lane::Domestic, Tick(0), 5)); // booth 1 full (Q = 1)
        block.update_state();
        assert_eq!(block.min_queue(), Some(2));
        assert_eq!(block.queue_size(), 1);
    }

    #[test]
    fn no_space_when_every_candidate_is_full_or_dark() {
        let mut block = ParallelServer::new(Lane::Domestic, 2, 1);
        block.set_online_prefix(1);
        block.enqueue_at(0, pax(1, Lane::Domestic, Tick(0), 5));
        block.update_state();
        assert!(!block.has_space());
        assert_eq!(block.min_queue(), None);
    }

    #[test]
    fn online_prefix_is_stable_in_list_order() {
        let mut block = ParallelServer::new(Lane::Domestic, 4, 1);
        block.set_online_prefix(2);
        let online: Vec<bool> = block.booths().iter().map(|b| b.online).collect();
        assert_eq!(online, vec![true, true, false, false]);
    }
}

// ── Routing and assignment ────────────────────────────────────────────────────

mod customs_tests {
    use super::*;

    #[test]
    fn arrivals_route_by_nationality() {
        let schedule = flat_schedule((2, 2), (2, 2));
        let mut customs = Customs::new(&schedule, 1);
        let p = plane(
            1,
            Tick(0),
            vec![
                pax(1, Lane::Domestic, Tick(0), 5),
                pax(2, Lane::Foreign, Tick(0), 5),
                pax(3, Lane::Domestic, Tick(0), 5),
            ],
        );
        customs.handle_arrivals(vec![p]);
        assert_eq!(customs.section(Lane::Domestic).feeder.len(), 2);
        assert_eq!(customs.section(Lane::Foreign).feeder.len(), 1);
    }

    #[test]
    fn manifest_is_drained_from_the_tail() {
        // One booth, two domestic passengers with distinct service times.
        // If the tail passenger (id 2, service 7) boards the feeder first it
        // is served first and departs at tick 7; FIFO deplaning would give
        // the id-1 passenger a departure of tick 2 instead.
        let schedule = flat_schedule((1, 1), (1, 1));
        let planes = vec![plane(
            1,
            Tick(0),
            vec![
                pax(1, Lane::Domestic, Tick(0), 2),
                pax(2, Lane::Domestic, Tick(0), 7),
            ],
        )];
        let (_, serviced, _) = run_day(schedule, planes, grid10());
        let first = serviced.iter().find(|p| p.id == PassengerId(2)).unwrap();
        assert_eq!(first.departure_time, Some(Tick(7)));
        let second = serviced.iter().find(|p| p.id == PassengerId(1)).unwrap();
        assert_eq!(second.departure_time, Some(Tick(10))); // picked up at 8
    }

    #[test]
    fn update_servers_only_acts_on_hour_boundaries() {
        let grid = grid10();
        let schedule = flat_schedule((2, 2), (2, 2));
        let mut customs = Customs::new(&schedule, 1);
        customs.update_servers(&schedule, Tick(1), &grid);
        assert_eq!(customs.online_total(), 0, "mid-hour tick must not staff booths");
        customs.update_servers(&schedule, Tick(360), &grid);
        assert_eq!(customs.online_total(), 4);
    }

    #[test]
    fn end_of_day_boundary_opens_no_new_hour() {
        let grid = grid10();
        let schedule = flat_schedule((2, 0), (2, 0));
        let mut customs = Customs::new(&schedule, 1);
        // Would index hour 24 if the guard were missing.
        customs.update_servers(&schedule, grid.end_of_day(), &grid);
        assert_eq!(customs.online_total(), 0);
    }
}

// ── Full-day runs ─────────────────────────────────────────────────────────────

mod sim_tests {
    use super::*;

    #[test]
    fn runs_with_the_noop_observer() {
        let mut sim = Simulation::new(
            grid10(),
            flat_schedule((1, 1), (1, 1)),
            MemoryRoster::new(vec![]),
            1,
        );
        let summary = sim.run(&mut NoopObserver).unwrap();
        assert_eq!(summary.final_tick, Tick(8_640));
    }

    #[test]
    fn empty_roster_runs_clean() {
        let (summary, serviced, sim) = run_day(flat_schedule((1, 1), (1, 1)), vec![], grid10());
        assert_eq!(summary.passengers_loaded, 0);
        assert_eq!(summary.passengers_served, 0);
        assert_eq!(summary.final_tick, Tick(8_640));
        assert!(serviced.is_empty());
        // Booths were online but untouched: every snapshot is exactly zero.
        let stats = sim.customs.server_stats();
        assert_eq!(stats.len(), 48); // 24 hours × 2 lanes
        assert!(stats.iter().all(|r| r.mean_utilization == 0.0 && r.num_servers == 1));
    }

    #[test]
    fn single_booth_queue_discipline_is_exact() {
        // Five passengers at 00:00:00, one booth, 6-tick (60 s) service.
        // Pickups at 0, 7, 14, 21, 28 → departures 6, 13, 20, 27, 34.
        let planes = vec![plane(
            1,
            Tick(0),
            (0..5).map(|i| pax(i, Lane::Domestic, Tick(0), 6)).collect(),
        )];
        let (summary, serviced, _) = run_day(flat_schedule((1, 1), (1, 0)), planes, grid10());
        assert_eq!(summary.passengers_served, 5);
        let mut w = waits(&serviced);
        w.sort_unstable();
        assert_eq!(w, vec![6, 13, 20, 27, 34]);
    }

    #[test]
    fn two_lanes_with_equal_load_wait_equally() {
        // Two planes at 00:00:00: ten domestic + ten foreign, two booths per
        // lane, identical 6-tick service.
        let planes = vec![
            plane(1, Tick(0), (0..10).map(|i| pax(i, Lane::Domestic, Tick(0), 6)).collect()),
            plane(2, Tick(0), (10..20).map(|i| pax(i, Lane::Foreign, Tick(0), 6)).collect()),
        ];
        let (summary, serviced, _) = run_day(flat_schedule((2, 2), (2, 2)), planes, grid10());
        assert_eq!(summary.passengers_served, 20);

        let lane_mean = |lane: Lane| {
            let w: Vec<u32> = serviced
                .iter()
                .filter(|p| p.nationality == lane)
                .filter_map(|p| p.wait_ticks())
                .collect();
            w.iter().sum::<u32>() as f64 / w.len() as f64
        };
        assert_eq!(lane_mean(Lane::Domestic), lane_mean(Lane::Foreign));
        // Everyone clears within hour 0.
        assert!(serviced.iter().all(|p| p.departure_time.unwrap() < Tick(360)));
    }

    #[test]
    fn conservation_holds_under_overload() {
        // Ten passengers, one booth, 1000-tick service: the day ends with
        // work still in the system.  Pickup k happens at (k-1)·1001, so 8
        // complete, 1 is in service, 1 waits at the booth.
        let planes = vec![plane(
            1,
            Tick(0),
            (0..10).map(|i| pax(i, Lane::Domestic, Tick(0), 1_000)).collect(),
        )];
        let (summary, serviced, sim) = run_day(flat_schedule((1, 1), (1, 0)), planes, grid10());
        assert_eq!(summary.passengers_served, 8);
        assert_eq!(serviced.len(), 8);
        let pop = sim.customs.population();
        assert_eq!(pop.serviced, 8);
        assert_eq!(pop.in_service, 1);
        assert_eq!(pop.at_booths, 1);
        assert_eq!(pop.in_feeders, 0);
        assert_eq!(pop.total(), summary.passengers_loaded);
    }

    #[test]
    fn identical_inputs_give_identical_outcomes() {
        let make_planes = || {
            vec![
                plane(1, Tick(90), (0..7).map(|i| pax(i, Lane::Domestic, Tick(90), 6)).collect()),
                plane(2, Tick(400), (7..12).map(|i| pax(i, Lane::Foreign, Tick(400), 13)).collect()),
            ]
        };
        let schedule = flat_schedule((3, 2), (3, 1));
        let (_, a, _) = run_day(schedule.clone(), make_planes(), grid10());
        let (_, b, _) = run_day(schedule, make_planes(), grid10());
        let key = |p: &Passenger| (p.id, p.departure_time);
        assert_eq!(a.iter().map(key).collect::<Vec<_>>(), b.iter().map(key).collect::<Vec<_>>());
    }

    #[test]
    fn more_booths_never_raise_the_mean_wait() {
        let make_planes = || {
            vec![plane(
                1,
                Tick(0),
                (0..20).map(|i| pax(i, Lane::Domestic, Tick(0), 6)).collect(),
            )]
        };
        let mean = |booths: u32| {
            let (_, serviced, _) =
                run_day(flat_schedule((4, booths), (1, 0)), make_planes(), grid10());
            let w = waits(&serviced);
            w.iter().sum::<u32>() as f64 / w.len() as f64
        };
        assert!(mean(3) <= mean(1));
        assert!(mean(4) <= mean(3));
    }

    #[test]
    fn speed_factors_agree_at_report_granularity() {
        // Same physical day at 10 s and 1 s ticks: 3 passengers, one booth,
        // 10-minute transactions.  Mean waits in integer minutes agree.
        let run_at = |speed: u32, service: u32| {
            let grid = TimeGrid::new(speed).unwrap();
            let planes = vec![plane(
                1,
                Tick(0),
                (0..3).map(|i| pax(i, Lane::Domestic, Tick(0), service)).collect(),
            )];
            let (_, serviced, _) = run_day(flat_schedule((1, 1), (1, 0)), planes, grid.clone());
            let w = waits(&serviced);
            let mean = w.iter().sum::<u32>() as f64 / w.len() as f64;
            grid.ticks_to_minutes(mean)
        };
        assert_eq!(run_at(10, 60), run_at(1, 600));
    }

    #[test]
    fn passengers_wait_for_the_hour_their_lane_is_staffed() {
        // Domestic staffing: 0 booths in hour 0, 1 booth from hour 1.
        let mut hours = [1u32; 24];
        hours[0] = 0;
        let schedule = ServerSchedule::new(vec![
            LaneSchedule { lane: Lane::Domestic, max: 1, hours },
            LaneSchedule::flat(Lane::Foreign, 1, 0),
        ])
        .unwrap();
        let planes = vec![plane(
            1,
            Tick(180), // 00:30:00
            vec![pax(1, Lane::Domestic, Tick(180), 6)],
        )];
        let (_, serviced, _) = run_day(schedule, planes, grid10());
        assert_eq!(serviced.len(), 1);
        // Picked up at the hour-1 boundary tick 360, departs 366.
        assert_eq!(serviced[0].departure_time, Some(Tick(366)));
        assert_eq!(serviced[0].wait_ticks(), Some(186));
    }
}
