//! Ray-cast queue demo
//!
//! Headless simulation of a crowd of agents flooding a shared physics world
//! with line-of-sight queries. The queue admits a fixed number per tick and
//! the latent caster answers a couple of frames later.
//!
//! Usage: `raycast_demo [config.toml|config.ron]`

use std::cell::RefCell;
use std::rc::Rc;

use rand::Rng;
use thiserror::Error;

use raycast_queue::foundation::logging;
use raycast_queue::prelude::*;

const FRAME_TIME: f32 = 1.0 / 60.0;
const FRAMES: u64 = 600;
const STATS_INTERVAL: u64 = 120;
const BODY_COUNT: u32 = 64;
const AGENT_COUNT: u32 = 24;
const WORLD_EXTENT: f32 = 50.0;
const CASTER_LATENCY_TICKS: u32 = 2;
const MAX_BURST: usize = 48;
const CANCEL_CHANCE: f64 = 0.05;

#[derive(Error, Debug)]
enum DemoError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error("Failed to serialize stats: {0}")]
    Stats(#[from] ron::Error),
}

#[derive(Debug, Default)]
struct Tally {
    hits: u64,
    misses: u64,
}

struct RayCastDemo {
    queue: RayCastQueue<LatentCaster<SphereCaster>>,
    tally: Rc<RefCell<Tally>>,
    outstanding: Vec<QueuedId>,
    canceled: u64,
}

impl RayCastDemo {
    fn new(config: RayCastQueueConfig) -> Result<Self, DemoError> {
        let mut rng = rand::thread_rng();
        let mut world = SphereCaster::new();

        for id in 0..BODY_COUNT {
            let center = random_point(&mut rng);
            let radius = rng.gen_range(0.5..3.0);
            let object_type = if id < AGENT_COUNT {
                ObjectTypes::LIVING
            } else if rng.gen_bool(0.7) {
                ObjectTypes::STATIC
            } else {
                ObjectTypes::RIGID
            };
            world.add_body(EntityId(id), BoundingSphere::new(center, radius), object_type);
        }
        log::info!("World populated with {} bodies", world.body_count());

        let caster = LatentCaster::new(world, CASTER_LATENCY_TICKS);
        let queue = RayCastQueue::new(config, caster)?;

        Ok(Self {
            queue,
            tally: Rc::default(),
            outstanding: Vec::new(),
            canceled: 0,
        })
    }

    fn submit_burst(&mut self, rng: &mut impl Rng) {
        let burst = rng.gen_range(0..=MAX_BURST);

        for _ in 0..burst {
            let agent = EntityId(rng.gen_range(0..AGENT_COUNT));
            let priority = Priority::ALL[rng.gen_range(0..Priority::ALL.len())];
            let request = RayCastRequest::segment(random_point(rng), random_point(rng))
                .with_object_types(ObjectTypes::SOLID | ObjectTypes::LIVING)
                .skipping(agent);
            let requester = RequesterDebugInfo::new("Perception")
                .with_custom("line of sight")
                .with_entity(agent);

            let tally = Rc::clone(&self.tally);
            let id = self.queue.queue_with(
                priority,
                request,
                move |_, result: RayCastResult| {
                    let mut tally = tally.borrow_mut();
                    if result.has_hit() {
                        tally.hits += 1;
                    } else {
                        tally.misses += 1;
                    }
                },
                None,
                &requester,
            );
            self.outstanding.push(id);
        }
    }

    fn cancel_some(&mut self, rng: &mut impl Rng) {
        let queue = &mut self.queue;
        self.outstanding.retain(|&id| queue.is_pending(id));

        let mut canceled = 0;
        self.outstanding.retain(|&id| {
            if rng.gen_bool(CANCEL_CHANCE) && queue.cancel(id) {
                canceled += 1;
                false
            } else {
                true
            }
        });
        self.canceled += canceled;
    }

    fn report(&mut self) {
        let stats = self.queue.contention_stats();
        let tally = self.tally.borrow();
        log::info!(
            "Frame {}: backlog {} (peak {}), in flight {}, deferred avg {:.1}/tick, utilization {:.0}%",
            self.queue.frame_id(),
            stats.queue_size,
            stats.peak_queue_size,
            self.queue.in_flight_count(),
            stats.deferred_average,
            stats.utilization() * 100.0
        );
        log::info!(
            "  {} hits, {} misses, {} canceled, {} completed since last report",
            tally.hits,
            tally.misses,
            self.canceled,
            stats.recently_completed_requests.len()
        );

        let slowest = stats
            .recently_completed_requests
            .iter()
            .filter_map(|info| info.latency_frames().map(|frames| (frames, info)))
            .max_by_key(|(frames, _)| *frames);
        if let Some((frames, info)) = slowest {
            log::debug!(
                "  slowest request {} ({:?}, {}) took {} frames",
                info.queued_id,
                info.priority,
                info.requester,
                frames
            );
        }
    }

    fn run(&mut self) -> Result<ContentionStats, DemoError> {
        let mut rng = rand::thread_rng();

        for frame in 1..=FRAMES {
            self.submit_burst(&mut rng);
            self.cancel_some(&mut rng);
            self.queue.update(FRAME_TIME);

            if frame % STATS_INTERVAL == 0 {
                self.report();
            }
        }

        let dropped = self.queue.cancel_all();
        if dropped > 0 {
            log::warn!("{} requests still pending at shutdown were canceled", dropped);
        }

        Ok(self.queue.contention_stats())
    }
}

fn random_point(rng: &mut impl Rng) -> Vec3 {
    Vec3::new(
        rng.gen_range(-WORLD_EXTENT..WORLD_EXTENT),
        rng.gen_range(-WORLD_EXTENT..WORLD_EXTENT),
        rng.gen_range(-WORLD_EXTENT..WORLD_EXTENT),
    )
}

fn load_config() -> Result<RayCastQueueConfig, DemoError> {
    match std::env::args().nth(1) {
        Some(path) => Ok(RayCastQueueConfig::load_from_file(path)?),
        None => Ok(RayCastQueueConfig::new(32).with_extended_stats(true, true)),
    }
}

fn main() -> Result<(), DemoError> {
    let config = load_config()?;
    logging::init_with_level(&config.log_level);

    log::info!("Starting ray-cast queue demo (quota {})", config.quota);

    let mut demo = RayCastDemo::new(config)?;
    let stats = demo.run()?;

    let pretty = ron::ser::PrettyConfig::default();
    println!("{}", ron::ser::to_string_pretty(&stats, pretty)?);

    Ok(())
}
