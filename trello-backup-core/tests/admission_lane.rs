use std::sync::Mutex;
use std::time::Duration;

use futures::future::join_all;
use tokio::time::Instant;
use trello_backup_core::client::AdmissionLane;

const INTERVAL: Duration = Duration::from_millis(200);

#[tokio::test(start_paused = true)]
async fn concurrent_callers_are_admitted_in_arrival_order_one_interval_apart() {
    let lane = AdmissionLane::new(INTERVAL);
    let admitted = Mutex::new(Vec::new());

    let callers = (0..5).map(|i| {
        let lane = &lane;
        let admitted = &admitted;
        async move {
            let at = lane.admit().await;
            admitted.lock().unwrap().push((i, at));
        }
    });
    join_all(callers).await;

    let admitted = admitted.into_inner().unwrap();
    let order: Vec<usize> = admitted.iter().map(|(i, _)| *i).collect();
    assert_eq!(order, vec![0, 1, 2, 3, 4]);

    for pair in admitted.windows(2) {
        let gap = pair[1].1 - pair[0].1;
        assert!(gap >= INTERVAL, "admissions only {gap:?} apart");
    }
}

#[tokio::test(start_paused = true)]
async fn first_caller_is_admitted_immediately() {
    let lane = AdmissionLane::new(INTERVAL);
    let start = Instant::now();

    lane.admit().await;

    assert_eq!(Instant::now() - start, Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn caller_after_an_idle_interval_is_not_delayed() {
    let lane = AdmissionLane::new(INTERVAL);
    lane.admit().await;

    tokio::time::sleep(INTERVAL * 3).await;
    let before = Instant::now();
    let at = lane.admit().await;

    assert_eq!(at, before);
}

#[tokio::test(start_paused = true)]
async fn back_to_back_callers_wait_for_the_interval() {
    let lane = AdmissionLane::new(INTERVAL);
    let first = lane.admit().await;
    let second = lane.admit().await;

    assert_eq!(second - first, INTERVAL);
    assert_eq!(lane.interval(), INTERVAL);
}
