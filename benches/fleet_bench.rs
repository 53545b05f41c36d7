#![feature(test)]

extern crate test;

#[cfg(test)]
mod fleet {
    use env_logger::{Builder, Env};
    use log::info;

    use clsim::activities::{single_run_process, Activity, SingleRun};
    use clsim::concepts::{Concept, Point, Speed};
    use clsim::simulator::Simulation;
    use test::Bencher;

    fn init_logger() {
        let _ = Builder::from_env(Env::default().default_filter_or("warn"))
            .is_test(true)
            .try_init();
    }

    /// A fleet of hoppers, each with its own borrow pit, sharing one
    /// destination.
    fn fleet_sim(vessels: usize) -> Simulation {
        let destination = Point::new(4.2, 52.1);
        let mut concepts = vec![Concept::site("destination", destination, 1_000.0, 0.0)
            .unwrap()
            .with_id("destination")];
        let mut activities: Vec<Activity> = Vec::new();
        for index in 0..vessels {
            let vessel = format!("hopper-{:02}", index);
            let pit = format!("pit-{:02}", index);
            let origin = Point::new(4.0 + 0.01 * index as f64, 52.0);
            concepts.push(
                Concept::site(&pit, origin, 100.0, 100.0)
                    .unwrap()
                    .with_id(&pit),
            );
            concepts.push(
                Concept::transport_processing_resource(
                    &vessel,
                    origin,
                    5.0,
                    0.05,
                    0.1,
                    Speed::Linear {
                        v_empty: 6.0,
                        v_full: 4.5,
                    },
                )
                .unwrap()
                .with_id(&vessel),
            );
            activities.push(single_run_process(SingleRun {
                name: &format!("{} run", vessel),
                origin: &pit,
                destination: "destination",
                mover: &vessel,
                loader: &vessel,
                unloader: &vessel,
                start_event: None,
                stop_event: None,
                requested_resources: None,
            }));
        }
        Simulation::post(concepts, activities)
    }

    #[test]
    fn fleet_empties_the_pits() {
        init_logger();
        let mut simulation = fleet_sim(4);
        simulation.run().unwrap();
        info!("fleet finished at t = {}", simulation.get_global_time());
        assert!(simulation.is_done());
        assert_eq!(simulation.get_level("pit-03", "default").unwrap(), 0.0);
        assert_eq!(simulation.get_level("destination", "default").unwrap(), 400.0);
    }

    #[bench]
    fn fleet_bench(b: &mut Bencher) {
        init_logger();
        let simulation = fleet_sim(4);
        b.iter(|| {
            let mut simulation = simulation.clone();
            simulation.run().unwrap()
        });
    }
}
