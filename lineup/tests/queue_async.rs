mod common;
use common::*;

use futures_util::StreamExt;
use lineup::{bounded, unbounded, List, Ordering, Queue};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;
use tokio::time::timeout;

#[tokio::test]
async fn queue_async_smoke() {
  init_tracing();
  let queue = unbounded(Ordering::Fifo);
  assert!(queue.push(10).await);
  assert_eq!(queue.next().await, Some(10));
}

#[tokio::test]
async fn queue_backpressure_scenario() {
  init_tracing();
  let queue = bounded(2, Ordering::Fifo).unwrap();

  assert!(queue.push(1).await);
  assert!(queue.push(2).await);

  let blocked = {
    let queue = queue.clone();
    tokio::spawn(async move { queue.push(3).await })
  };
  tokio::time::sleep(SHORT_TIMEOUT).await;
  assert!(!blocked.is_finished(), "third push should wait for capacity");

  assert_eq!(queue.next().await, Some(1));
  assert!(timeout(LONG_TIMEOUT, blocked).await.unwrap().unwrap());
  assert_eq!(queue.backlog(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn queue_multi_producer_fifo_preserves_per_producer_order() {
  init_tracing();
  let queue = bounded(8, Ordering::Fifo).unwrap();
  let num_producers = 4;
  let items_per_producer = ITEMS_HIGH;

  let mut handles = Vec::new();
  for producer in 0..num_producers {
    let queue = queue.clone();
    handles.push(tokio::spawn(async move {
      for i in 0..items_per_producer {
        assert!(queue.push((producer, i)).await);
      }
    }));
  }

  let consumer = {
    let queue = queue.clone();
    tokio::spawn(async move {
      let mut last_seen = vec![None; num_producers];
      let mut count = 0;
      while let Some((producer, i)) = queue.next().await {
        if let Some(last) = last_seen[producer] {
          assert!(i > last, "producer {} out of order: {} after {}", producer, i, last);
        }
        last_seen[producer] = Some(i);
        count += 1;
      }
      count
    })
  };

  for handle in handles {
    handle.await.unwrap();
  }
  queue.close();

  let count = timeout(STRESS_TIMEOUT, consumer).await.unwrap().unwrap();
  assert_eq!(count, num_producers * items_per_producer);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn queue_multi_consumer_delivers_each_value_once() {
  init_tracing();
  let queue = bounded(4, Ordering::Lifo).unwrap();
  let total = ITEMS_HIGH;
  let received = Arc::new(AtomicUsize::new(0));

  let mut consumers = Vec::new();
  for _ in 0..4 {
    let queue: Queue<usize> = queue.clone();
    let received = received.clone();
    consumers.push(tokio::spawn(async move {
      let mut seen = Vec::new();
      while let Some(v) = queue.next().await {
        received.fetch_add(1, AtomicOrdering::Relaxed);
        seen.push(v);
      }
      seen
    }));
  }

  for v in 0..total {
    assert!(queue.push(v).await);
  }
  queue.close();

  let mut all = HashSet::new();
  for consumer in consumers {
    for v in timeout(STRESS_TIMEOUT, consumer).await.unwrap().unwrap() {
      assert!(all.insert(v), "value {} delivered twice", v);
    }
  }
  assert_eq!(all.len(), total);
  assert_eq!(received.load(AtomicOrdering::Relaxed), total);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn queue_capacity_holds_under_contention() {
  init_tracing();
  let capacity = 3;
  let queue = bounded(capacity, Ordering::Fifo).unwrap();

  let mut producers = Vec::new();
  for _ in 0..6 {
    let queue = queue.clone();
    producers.push(tokio::spawn(async move {
      for i in 0..ITEMS_MEDIUM {
        assert!(queue.push(i).await);
      }
    }));
  }

  let mut consumed = 0;
  while consumed < 6 * ITEMS_MEDIUM {
    assert!(queue.backlog() <= capacity);
    let value = timeout(LONG_TIMEOUT, queue.next()).await.unwrap();
    assert!(value.is_some());
    consumed += 1;
    if consumed % 10 == 0 {
      tokio::task::yield_now().await;
    }
  }

  for producer in producers {
    producer.await.unwrap();
  }
  assert_eq!(queue.backlog(), 0);
}

#[tokio::test]
async fn queue_timeout_abandons_wait_without_side_effects() {
  init_tracing();
  let queue = bounded(1, Ordering::Fifo).unwrap();
  assert!(queue.push("kept").await);

  // The caller bounds the wait with an external timer.
  assert!(timeout(SHORT_TIMEOUT, queue.push("dropped")).await.is_err());
  assert_eq!(queue.backlog(), 1);
  assert!(format!("{:?}", queue).contains("waiting_producers: 0"));

  assert_eq!(queue.next().await, Some("kept"));
  assert!(timeout(SHORT_TIMEOUT, queue.next()).await.is_err());
}

#[tokio::test]
async fn queue_drains_into_list() {
  init_tracing();
  let queue = unbounded(Ordering::Fifo);
  for v in 0..ITEMS_LOW {
    queue.push(v).await;
  }
  queue.close();

  let list = List::from_stream(queue.clone()).await;
  assert_eq!(list.len(), ITEMS_LOW);
  assert_eq!(list.at(-1), Some(&(ITEMS_LOW - 1)));
  assert!(queue.is_empty());
}

#[derive(Debug, Clone, PartialEq)]
enum Inbound {
  Message { channel: u64, text: String },
  Shutdown,
}

// A producer loop feeding inbound events and a consumer loop turning them into
// replies, joined by two queues.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn queue_relays_between_event_loops() {
  init_tracing();
  let inbound = bounded::<Inbound>(4, Ordering::Fifo).unwrap();
  let outbound = unbounded::<String>(Ordering::Fifo);

  let worker = {
    let inbound = inbound.clone();
    let outbound = outbound.clone();
    tokio::spawn(async move {
      while let Some(event) = inbound.next().await {
        match event {
          Inbound::Message { channel, text } => {
            assert!(outbound.push(format!("#{}: {}", channel, text.to_uppercase())).await);
          }
          Inbound::Shutdown => {
            inbound.close();
          }
        }
      }
      outbound.close();
    })
  };

  for i in 0..ITEMS_LOW {
    let event = Inbound::Message {
      channel: (i % 3) as u64,
      text: format!("ping {}", i),
    };
    assert!(inbound.push(event).await);
  }
  assert!(inbound.push(Inbound::Shutdown).await);

  let replies: Vec<String> = timeout(LONG_TIMEOUT, outbound.clone().collect())
    .await
    .unwrap();
  worker.await.unwrap();

  assert_eq!(replies.len(), ITEMS_LOW);
  assert_eq!(replies[0], "#0: PING 0");
  assert_eq!(replies[ITEMS_LOW - 1], format!("#{}: PING {}", (ITEMS_LOW - 1) % 3, ITEMS_LOW - 1));
  assert!(!inbound.push(Inbound::Shutdown).await);
}
