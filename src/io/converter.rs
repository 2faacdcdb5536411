use crate::{engine::message::EngineMessage, io::midi::MidiEvent};

/// Translate a MIDI event into an engine message, keeping only events on
/// the configured channel. `midi_channel` is the 1-based MIDI Ch parameter
/// value (1-16), passed straight from the parameter store; events carry
/// the 0-based wire channel, so the mapping happens here. Velocity-0
/// note-ons pass through unchanged; the engine applies the note-off
/// convention itself.
pub fn midi_to_engine(midi: MidiEvent, midi_channel: u8) -> Option<EngineMessage> {
    let channel_filter = midi_channel.saturating_sub(1);
    match midi {
        MidiEvent::NoteOn {
            channel,
            key,
            velocity,
        } if channel == channel_filter => Some(EngineMessage::NoteOn {
            note: key,
            velocity,
        }),
        MidiEvent::NoteOff { channel, key, .. } if channel == channel_filter => {
            Some(EngineMessage::NoteOff { note: key })
        }
        MidiEvent::ControlChange {
            channel,
            controller: 123,
            ..
        } if channel == channel_filter => Some(EngineMessage::AllNotesOff),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ParamId, PulsarEngine};

    #[test]
    fn filters_by_channel() {
        let on = MidiEvent::NoteOn {
            channel: 3,
            key: 69,
            velocity: 100,
        };
        assert_eq!(
            midi_to_engine(on, 4),
            Some(EngineMessage::NoteOn {
                note: 69,
                velocity: 100
            })
        );
        assert_eq!(midi_to_engine(on, 3), None);
        assert_eq!(midi_to_engine(on, 1), None);
    }

    #[test]
    fn parameter_value_maps_to_wire_channel() {
        // The MIDI Ch parameter default (1) selects wire channel 0
        let engine = PulsarEngine::new(48_000.0);
        let midi_channel = engine.param(ParamId::MidiChannel) as u8;
        assert_eq!(midi_channel, 1);

        let on = MidiEvent::NoteOn {
            channel: 0,
            key: 60,
            velocity: 64,
        };
        assert_eq!(
            midi_to_engine(on, midi_channel),
            Some(EngineMessage::NoteOn {
                note: 60,
                velocity: 64
            })
        );
    }

    #[test]
    fn all_notes_off_controller() {
        let cc = MidiEvent::ControlChange {
            channel: 0,
            controller: 123,
            value: 0,
        };
        assert_eq!(midi_to_engine(cc, 1), Some(EngineMessage::AllNotesOff));

        let other = MidiEvent::ControlChange {
            channel: 0,
            controller: 1,
            value: 64,
        };
        assert_eq!(midi_to_engine(other, 1), None);
    }
}
