//! dasp_graph adapter - places sounds in a petgraph-backed processing graph

use dasp_graph::{Buffer, Input, NodeData};

use crate::sample::StereoSample;
use crate::sound::Sound;

/// Graph of [`GraphNode`]s, processed 64 frames at a time.
pub type SoundGraph = petgraph::graph::Graph<NodeData<GraphNode>, ()>;
pub type SoundProcessor = dasp_graph::Processor<SoundGraph>;

/// Renders a [`Sound`] into dasp_graph buffers.
///
/// Incoming buffers are summed into the sound's input, a mono input feeding
/// both channels. Output goes to buffer 0 (left) and buffer 1 (right); a node
/// with a single output buffer receives the mean of the two.
pub struct SoundNode {
    sound: Sound,
}

impl SoundNode {
    pub fn new(sound: Sound) -> Self {
        Self { sound }
    }

    pub fn sound(&self) -> &Sound {
        &self.sound
    }

    pub fn sound_mut(&mut self) -> &mut Sound {
        &mut self.sound
    }

    pub fn into_sound(self) -> Sound {
        self.sound
    }
}

fn gather(inputs: &[Input], frame: usize) -> StereoSample {
    let mut acc = StereoSample::SILENCE;
    for input in inputs {
        let buffers = input.buffers();
        let sample = match buffers {
            [] => continue,
            [mono] => StereoSample::mono(mono[frame]),
            [left, right, ..] => StereoSample::new(left[frame], right[frame]),
        };
        acc = acc + sample;
    }
    acc
}

impl dasp_graph::Node for SoundNode {
    fn process(&mut self, inputs: &[Input], output: &mut [Buffer]) {
        let frames = output.first().map_or(0, |b| b.len());

        for frame in 0..frames {
            let out = self.sound.process(gather(inputs, frame));

            match &mut *output {
                [] => {}
                [mono] => mono[frame] = (out.left + out.right) * 0.5,
                [left, right, ..] => {
                    left[frame] = out.left;
                    right[frame] = out.right;
                }
            }
        }
    }
}

/// Node kinds a [`SoundGraph`] can hold.
pub enum GraphNode {
    Sound(SoundNode),
    Sum(dasp_graph::node::Sum),
}

impl GraphNode {
    /// A stereo node rendering `sound`.
    pub fn sound(sound: Sound) -> NodeData<GraphNode> {
        NodeData::new2(GraphNode::Sound(SoundNode::new(sound)))
    }

    /// A stereo node summing its inputs.
    pub fn sum() -> NodeData<GraphNode> {
        NodeData::new2(GraphNode::Sum(dasp_graph::node::Sum))
    }
}

impl dasp_graph::Node for GraphNode {
    fn process(&mut self, inputs: &[Input], output: &mut [Buffer]) {
        match self {
            GraphNode::Sound(s) => s.process(inputs, output),
            GraphNode::Sum(s) => s.process(inputs, output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Generator, Modifier, ProcessContext};
    use crate::nodes::{Gain, LowPassFilter, Sine};
    use crate::sound::{create_basic_generator, create_basic_modifier};

    fn stereo(graph: &SoundGraph, idx: petgraph::graph::NodeIndex) -> (Vec<f32>, Vec<f32>) {
        let buffers = &graph[idx].buffers;
        (buffers[0].to_vec(), buffers[1].to_vec())
    }

    #[test]
    fn generator_feeds_modifier() {
        let ctx = ProcessContext::new(48_000);
        let mut graph = SoundGraph::with_capacity(4, 4);
        let mut processor = SoundProcessor::with_capacity(4);

        let sine = graph.add_node(GraphNode::sound(create_basic_generator(Sine::new(&ctx, 440.0))));
        let lpf = graph.add_node(GraphNode::sound(create_basic_modifier(
            LowPassFilter::new(&ctx, 1_000.0, 0.0).unwrap(),
        )));
        graph.add_edge(sine, lpf, ());

        let mut reference_sine = Sine::new(&ctx, 440.0);
        let mut reference_lpf = LowPassFilter::new(&ctx, 1_000.0, 0.0).unwrap();

        for _ in 0..3 {
            processor.process(&mut graph, lpf);
            let (left, right) = stereo(&graph, lpf);

            for i in 0..left.len() {
                let expected = reference_lpf.filter_sample(reference_sine.next_sample());
                assert_eq!(left[i], expected.left);
                assert_eq!(right[i], expected.right);
            }
        }
    }

    #[test]
    fn sum_node_mixes_sounds() {
        let ctx = ProcessContext::new(48_000);
        let mut graph = SoundGraph::with_capacity(4, 4);
        let mut processor = SoundProcessor::with_capacity(4);

        let a = graph.add_node(GraphNode::sound(create_basic_generator(Sine::new(&ctx, 100.0))));
        let b = graph.add_node(GraphNode::sound(
            create_basic_generator(Sine::new(&ctx, 100.0)).with_output_gain(-1.0),
        ));
        let sum = graph.add_node(GraphNode::sum());
        graph.add_edge(a, sum, ());
        graph.add_edge(b, sum, ());

        processor.process(&mut graph, sum);
        let (left, right) = stereo(&graph, sum);

        assert!(left.iter().chain(right.iter()).all(|s| s.abs() < 1e-6));
    }

    #[test]
    fn mono_output_is_downmixed() {
        let mut graph = SoundGraph::with_capacity(2, 1);
        let mut processor = SoundProcessor::with_capacity(2);

        let source = graph.add_node(GraphNode::sound(create_basic_generator(crate::nodes::Impulse::new(
            StereoSample::new(1.0, 0.0),
        ))));
        let mono = graph.add_node(NodeData::new1(GraphNode::Sound(SoundNode::new(create_basic_modifier(
            Gain::new(1.0).unwrap().without_smoothing(),
        )))));
        graph.add_edge(source, mono, ());

        processor.process(&mut graph, mono);
        let out = &graph[mono].buffers[0];

        assert_eq!(out[0], 0.5);
        assert!(out[1..].iter().all(|s| *s == 0.0));
    }
}
