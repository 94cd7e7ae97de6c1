use arbitrary::{unstructured::Unstructured, Arbitrary};
use rand::{prelude::random, rngs::SmallRng, Rng, SeedableRng};
use structopt::StructOpt;

use std::time;

use rbseg::{Linked, Order, RbNode, RbRoot, RbRootCached, Result, SegNode, SegRoot};

/// Command line options.
#[derive(Clone, StructOpt)]
pub struct Opt {
    #[structopt(long = "seed")]
    seed: Option<u64>,

    #[structopt(long = "cached")]
    cached: bool,

    #[structopt(long = "loads", default_value = "1000000")] // default 1M
    loads: usize,

    #[structopt(long = "loops", default_value = "3")]
    loops: usize,

    #[structopt(long = "incrs", default_value = "0")]
    incrs: usize,

    #[structopt(long = "segments", default_value = "0")]
    segments: usize,

    #[structopt(long = "queries", default_value = "0")]
    queries: usize,
}

struct Rec {
    rb: RbNode,
    data: u64,
}

impl Linked for Rec {
    fn as_rb(&self) -> &RbNode {
        &self.rb
    }

    fn as_rb_mut(&mut self) -> &mut RbNode {
        &mut self.rb
    }
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    Insert(u64),
    Delete(u32),
    Find(u32),
}

// plain and cached roots, behind one interface.
trait Handle {
    fn insert(&mut self, recs: &mut Vec<Rec>, id: usize) -> Result<()>;

    fn delete(&mut self, recs: &mut Vec<Rec>, id: usize) -> Result<()>;

    fn find(&self, recs: &Vec<Rec>, data: u64) -> Option<usize>;

    fn walk(&self, recs: &Vec<Rec>, order: Order) -> usize;

    fn root(&self) -> Option<usize>;
}

impl Handle for RbRoot {
    fn insert(&mut self, recs: &mut Vec<Rec>, id: usize) -> Result<()> {
        RbRoot::insert(self, recs, id, |a, b| a.data.cmp(&b.data))
    }

    fn delete(&mut self, recs: &mut Vec<Rec>, id: usize) -> Result<()> {
        RbRoot::delete(self, recs, id)
    }

    fn find(&self, recs: &Vec<Rec>, data: u64) -> Option<usize> {
        RbRoot::find(self, recs, &data, |rec, data| rec.data.cmp(data))
    }

    fn walk(&self, recs: &Vec<Rec>, order: Order) -> usize {
        self.cursor(recs, order).count_in(recs)
    }

    fn root(&self) -> Option<usize> {
        RbRoot::root(self)
    }
}

impl Handle for RbRootCached {
    fn insert(&mut self, recs: &mut Vec<Rec>, id: usize) -> Result<()> {
        RbRootCached::insert(self, recs, id, |a, b| a.data.cmp(&b.data))
    }

    fn delete(&mut self, recs: &mut Vec<Rec>, id: usize) -> Result<()> {
        RbRootCached::delete(self, recs, id)
    }

    fn find(&self, recs: &Vec<Rec>, data: u64) -> Option<usize> {
        RbRootCached::find(self, recs, &data, |rec, data| rec.data.cmp(data))
    }

    fn walk(&self, recs: &Vec<Rec>, order: Order) -> usize {
        self.cursor(recs, order).count_in(recs)
    }

    fn root(&self) -> Option<usize> {
        RbRootCached::root(self)
    }
}

trait CountIn {
    fn count_in(self, recs: &Vec<Rec>) -> usize;
}

impl CountIn for rbseg::Cursor {
    fn count_in(mut self, recs: &Vec<Rec>) -> usize {
        let mut n = 0;
        while self.next(recs).is_some() {
            n += 1;
        }
        n
    }
}

fn main() {
    let opts = Opt::from_args();
    let seed = opts.seed.unwrap_or_else(random);
    println!("seed {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    if opts.cached {
        do_tree(&opts, RbRootCached::new(), &mut rng)
    } else {
        do_tree(&opts, RbRoot::new(), &mut rng)
    }

    if opts.segments > 0 {
        do_segments(&opts, &mut rng)
    }
}

fn do_tree<H: Handle>(opts: &Opt, mut root: H, rng: &mut SmallRng) {
    println!("generate {} nodes", opts.loads);
    let mut recs: Vec<Rec> = (0..opts.loads)
        .map(|_| Rec {
            rb: RbNode::new(),
            data: rng.gen(),
        })
        .collect();

    let start = time::Instant::now();
    for id in 0..recs.len() {
        root.insert(&mut recs, id).unwrap();
    }
    println!("loaded {} items in {:?}", recs.len(), start.elapsed());
    println!("depth {}", depth(&recs, root.root()));

    for lp in 0..opts.loops {
        let start = time::Instant::now();
        for id in 0..recs.len() {
            if root.find(&recs, recs[id].data).is_none() {
                panic!("loop-{} missing node {}", lp, id);
            }
        }
        println!("find loop-{} for {} items, took {:?}", lp, recs.len(), start.elapsed());
    }

    do_incremental(opts, &mut root, &mut recs, rng);

    let start = time::Instant::now();
    let n = root.walk(&recs, Order::Ascending);
    println!("in-order for iterating {}, took {:?}", n, start.elapsed());

    let start = time::Instant::now();
    let n = root.walk(&recs, Order::PostOrder);
    println!("post-order for iterating {}, took {:?}", n, start.elapsed());
}

fn do_incremental<H: Handle>(opts: &Opt, root: &mut H, recs: &mut Vec<Rec>, rng: &mut SmallRng) {
    if opts.incrs == 0 {
        return;
    }

    let mut counts = [0_usize; 3];
    let start = time::Instant::now();
    for _i in 0..opts.incrs {
        let bytes = rng.gen::<[u8; 32]>();
        let mut uns = Unstructured::new(&bytes);
        let op: Op = match uns.arbitrary() {
            Ok(op) => op,
            Err(_) => continue,
        };

        match op {
            Op::Insert(data) => {
                counts[0] += 1;
                let id = recs.len();
                recs.push(Rec {
                    rb: RbNode::new(),
                    data,
                });
                root.insert(recs, id).ok();
            }
            Op::Delete(id) if !recs.is_empty() => {
                counts[1] += 1;
                let id = (id as usize) % recs.len();
                if recs[id].rb.is_linked() {
                    root.delete(recs, id).ok();
                }
            }
            Op::Find(id) if !recs.is_empty() => {
                counts[2] += 1;
                let id = (id as usize) % recs.len();
                root.find(recs, recs[id].data);
            }
            Op::Delete(_) | Op::Find(_) => (),
        }
    }
    println!(
        "incremental for operations {:?}, took {:?}",
        counts,
        start.elapsed()
    );
}

fn do_segments(opts: &Opt, rng: &mut SmallRng) {
    let mut segs: Vec<SegNode<u64>> = (0..opts.segments)
        .map(|_| {
            let start = rng.gen::<u64>() % 1_000_000;
            let len = rng.gen::<u64>() % 1_000;
            SegNode::new(start, start + len + 1)
        })
        .collect();

    let mut root = SegRoot::new();
    let start = time::Instant::now();
    for id in 0..segs.len() {
        root.insert(&mut segs, id).unwrap();
    }
    println!("loaded {} segments in {:?}", segs.len(), start.elapsed());

    let start = time::Instant::now();
    let mut hits = 0;
    for _i in 0..opts.queries {
        let lo = rng.gen::<u64>() % 1_000_000;
        let hi = lo + (rng.gen::<u64>() % 1_000) + 1;
        hits += root.overlaps(&segs, lo, hi).count();
    }
    println!(
        "queries {} reported {} segments, took {:?}",
        opts.queries,
        hits,
        start.elapsed()
    );
}

fn depth(recs: &Vec<Rec>, node: Option<usize>) -> usize {
    match node {
        Some(id) => {
            let rb = recs[id].as_rb();
            1 + std::cmp::max(depth(recs, rb.left()), depth(recs, rb.right()))
        }
        None => 0,
    }
}
