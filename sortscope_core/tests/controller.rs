use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;

use sortscope_core::{
    Algorithm, ChannelObserver, RunOutcome, RunState, Snapshot, VizError, VizEvent, Visualizer,
    VisualizerConfig,
};

fn visualizer() -> (Visualizer, UnboundedReceiver<VizEvent>) {
    let (observer, rx) = ChannelObserver::new();
    let config = VisualizerConfig {
        seed: Some(26),
        ..Default::default()
    };
    let viz = Visualizer::new(config, Arc::new(observer)).unwrap();
    (viz, rx)
}

fn drain(rx: &mut UnboundedReceiver<VizEvent>) -> Vec<VizEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn snapshots(events: &[VizEvent]) -> Vec<Snapshot> {
    events
        .iter()
        .filter_map(|event| match event {
            VizEvent::Snapshot(snapshot) => Some(snapshot.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn bubble_passes() {
    let (viz, mut rx) = visualizer();
    viz.load_array(vec![5, 3, 8, 1]).unwrap();
    drain(&mut rx);

    let outcome = viz.start(Algorithm::Bubble).unwrap().join().await;
    let RunOutcome::Completed { record, counts } = outcome else {
        panic!("run did not complete: {outcome:?}");
    };
    assert_eq!(record.algorithm, Algorithm::Bubble);
    assert_eq!(record.array_size, 4);
    assert_eq!(counts.comparisons, 6);
    assert_eq!(counts.exchanges, 4);

    let events = drain(&mut rx);
    let exchanged: Vec<Vec<u32>> = snapshots(&events)
        .into_iter()
        .filter(|s| s.swapping.is_some())
        .map(|s| s.values)
        .collect();
    assert_eq!(
        exchanged,
        [
            vec![3, 5, 8, 1],
            vec![3, 5, 1, 8],
            vec![3, 1, 5, 8],
            vec![1, 3, 5, 8]
        ]
    );

    let last = snapshots(&events).pop().unwrap();
    assert!(last.completed);
    assert_eq!(last.values, [1, 3, 5, 8]);
    assert_eq!((last.comparing, last.swapping), (None, None));

    assert!(matches!(events.last(), Some(VizEvent::History(records)) if records.len() == 1));
    assert_eq!(viz.state(), RunState::Completed);
    assert_eq!(viz.history(), [record]);
    assert_eq!(viz.markers(), (None, None));
}

#[tokio::test(start_paused = true)]
async fn elapsed_follows_the_delay() {
    let (viz, _rx) = visualizer();
    viz.load_array(vec![5, 3, 8, 1]).unwrap();

    // ten primitives at 101 ms each
    viz.start(Algorithm::Bubble).unwrap().join().await;
    let elapsed = viz.history()[0].elapsed_ms;
    assert!((1000..=1010).contains(&elapsed), "elapsed {elapsed}");
    assert_eq!(viz.elapsed_ms(), elapsed);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(viz.elapsed_ms(), elapsed);
}

#[tokio::test(start_paused = true)]
async fn trivial_arrays_complete_without_steps() {
    let (viz, mut rx) = visualizer();

    for values in [vec![], vec![42]] {
        viz.load_array(values.clone()).unwrap();
        drain(&mut rx);

        let outcome = viz.start(Algorithm::Quick).unwrap().join().await;
        let RunOutcome::Completed { record, counts } = outcome else {
            panic!("run did not complete: {outcome:?}");
        };
        assert_eq!(counts.total(), 0);
        assert_eq!(record.array_size, values.len());
        assert_eq!(viz.array(), values);

        let events = drain(&mut rx);
        assert!(snapshots(&events)
            .iter()
            .all(|s| s.comparing.is_none() && s.swapping.is_none()));
    }

    assert_eq!(viz.history().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn cancel_is_immediate_and_final() {
    let (viz, mut rx) = visualizer();
    viz.set_speed(1).unwrap();
    viz.load_array((1..=20).rev().collect()).unwrap();

    let handle = viz.start(Algorithm::Selection).unwrap();
    tokio::time::sleep(Duration::from_millis(1000)).await;

    assert!(viz.cancel());
    assert_eq!(viz.state(), RunState::Idle);
    assert_eq!(viz.markers(), (None, None));
    let paused_at = viz.elapsed_ms();
    assert!(paused_at > 0);

    let events = drain(&mut rx);
    let idle = snapshots(&events).pop().unwrap();
    assert!(!idle.completed);
    assert_eq!((idle.comparing, idle.swapping), (None, None));

    assert_eq!(handle.join().await, RunOutcome::Cancelled);
    tokio::time::sleep(Duration::from_millis(1000)).await;

    assert!(drain(&mut rx).is_empty());
    assert!(viz.history().is_empty());
    assert_eq!(viz.elapsed_ms(), paused_at);

    let mut values = viz.array();
    values.sort_unstable();
    assert_eq!(values, (1..=20).collect::<Vec<u32>>());

    assert!(!viz.cancel());
}

#[tokio::test(start_paused = true)]
async fn resume_continues_from_the_paused_array() {
    let (viz, _rx) = visualizer();
    viz.load_array((1..=10).rev().collect()).unwrap();

    let handle = viz.start(Algorithm::Bubble).unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    viz.cancel();
    handle.join().await;

    let paused_array = viz.array();
    let paused_at = viz.elapsed_ms();
    assert_ne!(paused_array, (1..=10).rev().collect::<Vec<u32>>());

    let outcome = viz.toggle().unwrap().unwrap().join().await;
    let RunOutcome::Completed { record, .. } = outcome else {
        panic!("run did not complete: {outcome:?}");
    };
    assert!(record.elapsed_ms > paused_at);
    assert_eq!(viz.array(), (1..=10).collect::<Vec<u32>>());
}

#[tokio::test(start_paused = true)]
async fn pausing_mid_shift_restores_the_key() {
    let (viz, _rx) = visualizer();
    viz.load_array(vec![2, 3, 4, 1]).unwrap();

    // Steps are 101ms apart: at 550ms 1 has been shifted past 4 and 3.
    let handle = viz.start(Algorithm::Insertion).unwrap();
    tokio::time::sleep(Duration::from_millis(550)).await;
    assert!(viz.cancel());
    assert_eq!(viz.array(), [2, 1, 3, 4]);
    assert_eq!(handle.join().await, RunOutcome::Cancelled);

    let outcome = viz.start(Algorithm::Insertion).unwrap().join().await;
    assert!(matches!(outcome, RunOutcome::Completed { .. }));
    assert_eq!(viz.array(), [1, 2, 3, 4]);
}

#[tokio::test(start_paused = true)]
async fn resumed_write_sorters_keep_every_value() {
    let input = vec![5, 9, 2, 7, 1, 8, 3, 6, 4, 10];
    let sorted = (1..=10).collect::<Vec<u32>>();

    for algorithm in [Algorithm::Insertion, Algorithm::Merge, Algorithm::Tree] {
        for pause_ms in [251, 453, 760, 1968, 2530] {
            let (viz, _rx) = visualizer();
            viz.load_array(input.clone()).unwrap();

            viz.start(algorithm).unwrap();
            tokio::time::sleep(Duration::from_millis(pause_ms)).await;
            viz.cancel();

            let mut paused = viz.array();
            paused.sort_unstable();
            assert_eq!(paused, sorted, "{algorithm} paused at {pause_ms}ms");

            let outcome = viz.start(algorithm).unwrap().join().await;
            assert!(matches!(outcome, RunOutcome::Completed { .. }));
            assert_eq!(viz.array(), sorted, "{algorithm} resumed at {pause_ms}ms");
            assert_eq!(viz.history().len(), 1);
        }
    }
}

#[tokio::test(start_paused = true)]
async fn toggle_pauses_a_running_visualizer() {
    let (viz, _rx) = visualizer();
    let handle = viz.toggle().unwrap().unwrap();
    assert!(viz.is_running());

    assert!(viz.toggle().unwrap().is_none());
    assert_eq!(viz.state(), RunState::Idle);
    assert_eq!(handle.join().await, RunOutcome::Cancelled);
}

#[tokio::test(start_paused = true)]
async fn requests_are_rejected_while_running() {
    let (viz, _rx) = visualizer();
    let before = viz.array();
    let handle = viz.start(Algorithm::Heap).unwrap();

    assert_eq!(viz.start(Algorithm::Heap).err(), Some(VizError::RunActive));
    assert_eq!(viz.new_array(10), Err(VizError::RunActive));
    assert_eq!(viz.regenerate(), Err(VizError::RunActive));
    assert_eq!(viz.load_array(vec![1, 2, 3]), Err(VizError::RunActive));
    assert_eq!(
        viz.select_algorithm(Algorithm::Merge),
        Err(VizError::RunActive)
    );
    assert_eq!(viz.algorithm(), Algorithm::Heap);
    assert_eq!(viz.size(), before.len());

    // speed is always accepted
    viz.set_speed(100).unwrap();
    assert_eq!(viz.speed().get(), 100);

    assert!(matches!(handle.join().await, RunOutcome::Completed { .. }));
}

#[tokio::test(start_paused = true)]
async fn history_keeps_the_ten_most_recent() {
    let (viz, _rx) = visualizer();
    viz.set_speed(100).unwrap();

    for size in 5..17 {
        viz.new_array(size).unwrap();
        viz.start(Algorithm::Comb).unwrap().join().await;
    }

    let history = viz.history();
    assert_eq!(history.len(), 10);
    let sizes: Vec<usize> = history.iter().map(|r| r.array_size).collect();
    assert_eq!(sizes, (7..17).rev().collect::<Vec<usize>>());
}

#[tokio::test(start_paused = true)]
async fn restart_after_completion_resets_the_stopwatch() {
    let (viz, mut rx) = visualizer();
    viz.load_array(vec![2, 1]).unwrap();
    viz.start(Algorithm::Insertion).unwrap().join().await;
    assert!(viz.elapsed_ms() > 0);
    drain(&mut rx);

    let handle = viz.start(Algorithm::Insertion).unwrap();
    assert_eq!(viz.elapsed_ms(), 0);
    assert_eq!(drain(&mut rx).first(), Some(&VizEvent::Tick(0)));
    handle.join().await;

    assert_eq!(viz.history().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn new_array_resets_to_idle() {
    let (viz, mut rx) = visualizer();
    viz.load_array(vec![2, 1]).unwrap();
    viz.start(Algorithm::Bubble).unwrap().join().await;
    assert_eq!(viz.state(), RunState::Completed);
    drain(&mut rx);

    viz.new_array(12).unwrap();
    assert_eq!(viz.state(), RunState::Idle);
    assert_eq!(viz.size(), 12);
    assert_eq!(viz.elapsed_ms(), 0);

    let events = drain(&mut rx);
    assert_eq!(events.first(), Some(&VizEvent::Tick(0)));
    assert!(matches!(events.last(), Some(VizEvent::Snapshot(s)) if s.values.len() == 12 && !s.completed));
}

#[tokio::test(start_paused = true)]
async fn speed_change_applies_mid_run() {
    let (viz, _rx) = visualizer();
    viz.set_speed(1).unwrap();
    viz.load_array((1..=30).rev().collect()).unwrap();

    let handle = viz.start(Algorithm::Bubble).unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    viz.set_speed(100).unwrap();

    let RunOutcome::Completed { counts, record } = handle.join().await else {
        panic!("run did not complete");
    };
    // at the slowest speed the whole run would take 198 ms per step
    assert!(record.elapsed_ms < counts.total() * 198 / 10);
}

#[tokio::test(start_paused = true)]
async fn bitonic_keeps_the_array_length() {
    let (viz, mut rx) = visualizer();
    viz.set_speed(100).unwrap();
    viz.load_array(vec![9, 4, 7, 1, 3]).unwrap();
    drain(&mut rx);

    viz.start(Algorithm::Bitonic).unwrap().join().await;
    assert_eq!(viz.array(), [1, 3, 4, 7, 9]);

    for snapshot in snapshots(&drain(&mut rx)) {
        assert_eq!(snapshot.values.len(), 5);
        assert!(snapshot.values.iter().all(|&v| v <= 9));
        for (i, j) in [snapshot.comparing, snapshot.swapping].into_iter().flatten() {
            assert!(i < 5 && j < 5);
        }
    }
}
