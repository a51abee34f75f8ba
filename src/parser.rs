//! Streams decoded OSM entities from a PBF extract into a [`Handler`] in
//! same-kind batches.

use std::{
    io::{Read, Seek},
    mem,
    path::Path,
};

use anyhow::{Context, Result};
use log::debug;
use osmpbfreader::OsmPbfReader;

use crate::element::{Element, ElementType, Node, Relation, Way};

pub const DEFAULT_BATCH_SIZE: usize = 1024;

/// Receives batches of entities in file order. Every callback defaults to a
/// no-op, so a handler only implements the kinds it cares about.
pub trait Handler {
    fn nodes(&mut self, _nodes: &[Node]) {}
    fn ways(&mut self, _ways: &[Way]) {}
    fn relations(&mut self, _relations: &[Relation]) {}
}

#[derive(Clone, Debug)]
pub struct OsmParser {
    concurrency: usize,
    batch_size: usize,
}

impl OsmParser {
    /// A `concurrency` above 1 decodes blocks on worker threads; the handler
    /// is still called from the current thread only.
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn parse<H: Handler>(&self, path: &Path, handler: &mut H) -> Result<()> {
        let r = std::fs::File::open(path)
            .with_context(|| format!("open src {}", path.display()))?;

        let mut pbf = OsmPbfReader::new(r);

        self.parse_reader(&mut pbf, handler)
    }

    pub fn parse_reader<R: Read + Seek, H: Handler>(
        &self,
        pbf: &mut OsmPbfReader<R>,
        handler: &mut H,
    ) -> Result<()> {
        if self.concurrency > 1 {
            let items = pbf
                .par_iter()
                .map(|it| it.context("Read item").map(Element::from));
            self.feed(items, handler)
        } else {
            let items = pbf
                .iter()
                .map(|it| it.context("Read item").map(Element::from));
            self.feed(items, handler)
        }
    }

    /// Batches `elements` into the handler. The first error stops the run;
    /// entities already buffered at that point are not delivered.
    pub fn feed<I, H>(&self, elements: I, handler: &mut H) -> Result<()>
    where
        I: IntoIterator<Item = Result<Element>>,
        H: Handler,
    {
        let mut batches = Batches::new(self.batch_size);
        for it in elements {
            batches.push(it?, handler);
        }
        batches.flush(handler);
        Ok(())
    }
}

#[derive(Debug)]
struct Batches {
    size: usize,
    nodes: Vec<Node>,
    ways: Vec<Way>,
    rels: Vec<Relation>,
}

impl Batches {
    fn new(size: usize) -> Self {
        Self {
            size,
            nodes: Vec::with_capacity(size),
            ways: Vec::with_capacity(size),
            rels: Vec::with_capacity(size),
        }
    }

    fn push<H: Handler>(&mut self, element: Element, handler: &mut H) {
        match element {
            Element::Node(n) => {
                self.flush_ways(handler);
                self.flush_rels(handler);
                self.nodes.push(n);
                if self.nodes.len() >= self.size {
                    self.flush_nodes(handler);
                }
            }
            Element::Way(w) => {
                self.flush_nodes(handler);
                self.flush_rels(handler);
                self.ways.push(w);
                if self.ways.len() >= self.size {
                    self.flush_ways(handler);
                }
            }
            Element::Relation(r) => {
                self.flush_nodes(handler);
                self.flush_ways(handler);
                self.rels.push(r);
                if self.rels.len() >= self.size {
                    self.flush_rels(handler);
                }
            }
        }
    }

    fn flush<H: Handler>(&mut self, handler: &mut H) {
        self.flush_nodes(handler);
        self.flush_ways(handler);
        self.flush_rels(handler);
    }

    fn flush_nodes<H: Handler>(&mut self, handler: &mut H) {
        if !self.nodes.is_empty() {
            let batch = mem::replace(&mut self.nodes, Vec::with_capacity(self.size));
            debug!("{} batch of {}", ElementType::Node, batch.len());
            handler.nodes(&batch);
        }
    }

    fn flush_ways<H: Handler>(&mut self, handler: &mut H) {
        if !self.ways.is_empty() {
            let batch = mem::replace(&mut self.ways, Vec::with_capacity(self.size));
            debug!("{} batch of {}", ElementType::Way, batch.len());
            handler.ways(&batch);
        }
    }

    fn flush_rels<H: Handler>(&mut self, handler: &mut H) {
        if !self.rels.is_empty() {
            let batch = mem::replace(&mut self.rels, Vec::with_capacity(self.size));
            debug!("{} batch of {}", ElementType::Relation, batch.len());
            handler.relations(&batch);
        }
    }
}
