use std::{
    sync::{
        mpsc::{channel, Receiver},
        Arc, Mutex,
    },
    thread::spawn,
};

/// Runs `process_fn` over `inputs` on `threads` workers; outputs arrive in completion order.
pub struct ThreadPool<Output> {
    output_receiver: Receiver<Output>,
}

impl<Output> ThreadPool<Output>
where
    Output: 'static + Send,
{
    pub fn new<Input: 'static + Send>(
        threads: usize,
        process_fn: impl Fn(Input) -> Output + 'static + Sync + Send,
        inputs: impl Iterator<Item = Input>,
    ) -> Self {
        let (input_sender, input_receiver) = channel::<Input>();
        let input_receiver = Arc::new(Mutex::new(input_receiver));
        let (output_sender, output_receiver) = channel();

        let process_fn = Arc::new(process_fn);
        for _ in 0..threads.max(1) {
            let input_receiver = input_receiver.clone();
            let output_sender = output_sender.clone();
            let process_fn = process_fn.clone();
            spawn(move || loop {
                let input = match input_receiver.lock() {
                    Ok(receiver) => receiver.recv(),
                    Err(_) => break,
                };
                match input {
                    Ok(input) => {
                        if output_sender.send(process_fn(input)).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        break;
                    }
                }
            });
        }
        for input in inputs {
            if input_sender.send(input).is_err() {
                break;
            }
        }
        Self { output_receiver }
    }
}

impl<Output> Iterator for ThreadPool<Output> {
    type Item = Output;

    fn next(&mut self) -> Option<Self::Item> {
        self.output_receiver.recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::ThreadPool;

    #[test]
    fn process_all_inputs() {
        let mut outputs: Vec<usize> = ThreadPool::new(3, |input: usize| input * 2, 0..100).collect();
        outputs.sort_unstable();
        assert_eq!(outputs, (0..100).map(|input| input * 2).collect::<Vec<_>>());
    }
}
