use crate::{
    processor::voice::{DEFAULT_MAX_TEXT_LENGTH, DEFAULT_SHORT_TEXT_THRESHOLD},
    AudioDownloader, SummaryOrchestrator, Transcriber, VoiceProcessor,
};

pub struct VoiceProcessorBuilder<D = (), T = (), O = ()> {
    downloader: D,
    transcriber: T,
    orchestrator: O,
    short_text_threshold: usize,
    max_text_length: usize,
}

impl VoiceProcessorBuilder {
    pub fn new() -> Self {
        Self {
            downloader: (),
            transcriber: (),
            orchestrator: (),
            short_text_threshold: DEFAULT_SHORT_TEXT_THRESHOLD,
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
        }
    }
}

impl Default for VoiceProcessorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, T, O> VoiceProcessorBuilder<D, T, O> {
    pub fn downloader<D2: AudioDownloader + Send + Sync + 'static>(
        self,
        downloader: D2,
    ) -> VoiceProcessorBuilder<D2, T, O> {
        VoiceProcessorBuilder {
            downloader,
            transcriber: self.transcriber,
            orchestrator: self.orchestrator,
            short_text_threshold: self.short_text_threshold,
            max_text_length: self.max_text_length,
        }
    }

    pub fn transcriber<T2: Transcriber + Send + Sync + 'static>(
        self,
        transcriber: T2,
    ) -> VoiceProcessorBuilder<D, T2, O> {
        VoiceProcessorBuilder {
            downloader: self.downloader,
            transcriber,
            orchestrator: self.orchestrator,
            short_text_threshold: self.short_text_threshold,
            max_text_length: self.max_text_length,
        }
    }

    pub fn orchestrator<O2: SummaryOrchestrator + Send + Sync + 'static>(
        self,
        orchestrator: O2,
    ) -> VoiceProcessorBuilder<D, T, O2> {
        VoiceProcessorBuilder {
            downloader: self.downloader,
            transcriber: self.transcriber,
            orchestrator,
            short_text_threshold: self.short_text_threshold,
            max_text_length: self.max_text_length,
        }
    }

    /// Transcripts with fewer characters are echoed back without a summary
    pub fn short_text_threshold(mut self, threshold: usize) -> Self {
        self.short_text_threshold = threshold;
        self
    }

    pub fn max_text_length(mut self, max_text_length: usize) -> Self {
        self.max_text_length = max_text_length;
        self
    }
}

impl<D, T, O> VoiceProcessorBuilder<D, T, O>
where
    D: AudioDownloader + Send + Sync + 'static,
    T: Transcriber + Send + Sync + 'static,
    O: SummaryOrchestrator + Send + Sync + 'static,
{
    pub fn build(self) -> VoiceProcessor<D, T, O> {
        VoiceProcessor {
            downloader: self.downloader,
            transcriber: self.transcriber,
            orchestrator: self.orchestrator,
            short_text_threshold: self.short_text_threshold,
            max_text_length: self.max_text_length,
        }
    }
}
