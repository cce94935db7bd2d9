use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use futures_util::StreamExt;
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;

use lineup::{bounded, unbounded, List, Ordering, Queue};

const ITEMS: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct QueueBenchConfig {
  capacity: Option<usize>,
  ordering: Ordering,
  num_producers: usize,
}

impl QueueBenchConfig {
  fn label(&self) -> String {
    let capacity = match self.capacity {
      Some(capacity) => format!("cap{}", capacity),
      None => "unbounded".to_string(),
    };
    format!("{}/{}/p{}", capacity, self.ordering, self.num_producers)
  }

  fn build(&self) -> Queue<u64> {
    match self.capacity {
      Some(capacity) => bounded(capacity, self.ordering).expect("bench capacity is non-zero"),
      None => unbounded(self.ordering),
    }
  }
}

// One full producer/consumer run: producers push their share, a single
// consumer drains until close.
async fn run_once(cfg: QueueBenchConfig) -> Duration {
  let queue = cfg.build();
  let per_producer = ITEMS / cfg.num_producers;
  let start = Instant::now();

  let consumer = {
    let queue = queue.clone();
    tokio::spawn(async move { queue.count().await })
  };

  let mut producers = Vec::with_capacity(cfg.num_producers);
  for _ in 0..cfg.num_producers {
    let queue = queue.clone();
    producers.push(tokio::spawn(async move {
      for i in 0..per_producer {
        queue.push(i as u64).await;
      }
    }));
  }
  for producer in producers {
    producer.await.expect("producer task panicked");
  }
  queue.close();

  let received = consumer.await.expect("consumer task panicked");
  let elapsed = start.elapsed();
  assert_eq!(received, per_producer * cfg.num_producers);
  elapsed
}

fn bench_queue_async(c: &mut Criterion) {
  let rt = Runtime::new().expect("failed to build tokio runtime");
  let mut group = c.benchmark_group("QueueAsync");
  group.throughput(Throughput::Elements(ITEMS as u64));

  let mut configs = Vec::new();
  for capacity in [Some(1), Some(128), None] {
    for ordering in [Ordering::Fifo, Ordering::Lifo] {
      for num_producers in [1, 4] {
        configs.push(QueueBenchConfig {
          capacity,
          ordering,
          num_producers,
        });
      }
    }
  }

  for cfg in configs {
    group.bench_with_input(BenchmarkId::from_parameter(cfg.label()), &cfg, |b, cfg| {
      b.iter_custom(|iters| {
        let mut total = Duration::ZERO;
        for _ in 0..iters {
          total += rt.block_on(run_once(*cfg));
        }
        total
      });
    });
  }
  group.finish();
}

fn bench_list(c: &mut Criterion) {
  let mut group = c.benchmark_group("List");
  group.throughput(Throughput::Elements(ITEMS as u64));

  group.bench_function("push_shift", |b| {
    b.iter(|| {
      let mut list = List::with_capacity(ITEMS);
      for i in 0..ITEMS {
        list.push(i);
      }
      while list.shift().is_some() {}
    })
  });

  group.bench_function("take_by_key", |b| {
    b.iter(|| {
      let mut list = List::with_capacity(ITEMS);
      let keys: Vec<_> = (0..ITEMS).map(|i| list.push(i)).collect();
      for key in keys.iter().step_by(2) {
        list.take(*key);
      }
      list.len()
    })
  });

  group.finish();
}

criterion_group!(benches, bench_queue_async, bench_list);
criterion_main!(benches);
