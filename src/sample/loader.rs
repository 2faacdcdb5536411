//! Lock-free handshake between the engine and a sample-loading worker.
//!
//! The engine sends the buffer itself with each request, so the worker
//! writes into memory the audio thread cannot currently see. Rings have
//! capacity for a single message: the engine never issues a second request
//! while one is in flight.

use rtrb::{Consumer, Producer, RingBuffer};

use super::SampleBuffer;

/// Request from the engine: fill `buffer` from the selected file.
pub struct LoadRequest {
    pub folder: u16,
    pub file: u16,
    pub buffer: SampleBuffer,
}

/// Worker's reply. `frames_loaded` is 0 when the load failed; the engine
/// then falls back to table synthesis.
#[derive(Debug)]
pub struct LoadResult {
    pub buffer: SampleBuffer,
    pub frames_loaded: usize,
}

/// Engine-side endpoints.
pub struct LoaderClient {
    requests: Producer<LoadRequest>,
    results: Consumer<LoadResult>,
}

/// Worker-side endpoints.
pub struct LoaderWorker {
    requests: Consumer<LoadRequest>,
    results: Producer<LoadResult>,
}

/// Build the paired endpoints.
pub fn loader_channel() -> (LoaderClient, LoaderWorker) {
    let (req_tx, req_rx) = RingBuffer::new(1);
    let (res_tx, res_rx) = RingBuffer::new(1);
    (
        LoaderClient {
            requests: req_tx,
            results: res_rx,
        },
        LoaderWorker {
            requests: req_rx,
            results: res_tx,
        },
    )
}

impl LoaderClient {
    /// Send a load request. On a full ring the request is dropped and the
    /// buffer handed back, so the caller can restore it.
    pub fn request(&mut self, request: LoadRequest) -> Result<(), SampleBuffer> {
        self.requests.push(request).map_err(|e| {
            let rtrb::PushError::Full(request) = e;
            request.buffer
        })
    }

    /// Non-blocking poll for a finished load.
    pub fn poll(&mut self) -> Option<LoadResult> {
        self.results.pop().ok()
    }
}

impl LoaderWorker {
    /// Next pending request, if any.
    pub fn next_request(&mut self) -> Option<LoadRequest> {
        self.requests.pop().ok()
    }

    /// Return a filled (or failed, `frames_loaded == 0`) buffer. The ring
    /// cannot be full unless the protocol was violated; the result is
    /// handed back in that case so the buffer is not lost.
    pub fn complete(&mut self, result: LoadResult) -> Result<(), LoadResult> {
        self.results.push(result).map_err(|e| {
            let rtrb::PushError::Full(result) = e;
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::SampleBank;

    #[test]
    fn request_and_result_round_trip() {
        let (mut client, mut worker) = loader_channel();
        let mut bank = SampleBank::new();

        let buffer = bank.begin_load().expect("buffer available");
        client
            .request(LoadRequest {
                folder: 2,
                file: 7,
                buffer,
            })
            .expect("empty ring accepts a request");

        let mut request = worker.next_request().expect("request visible to worker");
        assert_eq!((request.folder, request.file), (2, 7));
        for frame in request.buffer.frames_mut()[..64].iter_mut() {
            *frame = 0.5;
        }
        worker
            .complete(LoadResult {
                buffer: request.buffer,
                frames_loaded: 64,
            })
            .expect("empty ring accepts a result");

        let result = client.poll().expect("result visible to engine");
        bank.finish_load(result.buffer, result.frames_loaded);
        assert_eq!(bank.loaded_frames(), 64);
        assert_eq!(bank.read(10.0), 0.5);
    }

    #[test]
    fn full_request_ring_returns_the_buffer() {
        let (mut client, _worker) = loader_channel();

        client
            .request(LoadRequest {
                folder: 0,
                file: 0,
                buffer: SampleBuffer::new(),
            })
            .expect("first request fits");

        let returned = client.request(LoadRequest {
            folder: 0,
            file: 1,
            buffer: SampleBuffer::new(),
        });
        assert!(returned.is_err(), "second request must be rejected");
    }
}
