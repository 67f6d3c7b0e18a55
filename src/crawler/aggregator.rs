//! Match aggregation
//!
//! Tests every participant of a stream against the target set and turns hits
//! into numbered `MatchRecord`s. The aggregator is the only writer of the
//! match list, so ordinals stay gapless and in emission order.

use crate::crawler::endpoints::Endpoints;
use crate::crawler::social::SocialList;
use crate::model::{
    Category, MatchRecord, Participant, ProfileLinks, SearchReport, StreamRef, TargetSet,
};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

pub struct MatchAggregator {
    targets: TargetSet,
    endpoints: Endpoints,
    matches: Vec<MatchRecord>,
    next_ordinal: u64,
}

impl MatchAggregator {
    pub fn new(targets: TargetSet, endpoints: Endpoints) -> Self {
        Self {
            targets,
            endpoints,
            matches: Vec::new(),
            next_ordinal: 1,
        }
    }

    /// Records every target found among a stream's participants
    ///
    /// A target yields at most one record per stream; gifter entries win
    /// over viewer entries. The same target in another stream is a new record.
    ///
    /// Returns the number of records added.
    pub fn absorb(&mut self, stream: &StreamRef, social: &SocialList) -> usize {
        let mut matched: HashSet<&str> = HashSet::new();
        let before = self.matches.len();

        for participant in social.iter() {
            if !self.targets.contains(&participant.account_id)
                || !matched.insert(participant.account_id.as_str())
            {
                continue;
            }

            let record = self.build_record(stream, participant);
            tracing::info!(
                "Found {} ({}) as {} in stream {} of {}",
                record.target_display_name.as_deref().unwrap_or("-"),
                record.target_account_id,
                record.role,
                stream.stream_id,
                record.streamer_name.as_deref().unwrap_or(&record.streamer_id)
            );
            self.matches.push(record);
        }

        self.matches.len() - before
    }

    fn build_record(&mut self, stream: &StreamRef, participant: &Participant) -> MatchRecord {
        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;

        MatchRecord {
            ordinal,
            streamer_id: stream.broadcaster_id.clone(),
            streamer_name: stream.broadcaster_name.clone(),
            target_account_id: participant.account_id.clone(),
            target_display_name: participant.display_name.clone(),
            credits: participant.credits,
            profile_links: ProfileLinks {
                target: self.endpoints.profile_link(&participant.account_id),
                streamer: self.endpoints.profile_link(&stream.broadcaster_id),
            },
            stream_link: self.endpoints.stream_link(&stream.stream_id),
            role: participant.role,
            category: stream.category,
            vip_status: participant.vip_status.clone(),
            gender: participant.gender.clone(),
            is_subscriber: participant.is_subscriber,
            fan_level: participant.fan_level,
            incognito: participant.incognito,
        }
    }

    pub fn total_found(&self) -> usize {
        self.matches.len()
    }

    /// Finalizes the report
    pub fn into_report(
        self,
        searched_streams_count: u64,
        categories_searched: Vec<Category>,
        started_at: DateTime<Utc>,
    ) -> SearchReport {
        SearchReport {
            total_found: self.matches.len(),
            matches: self.matches,
            searched_streams_count,
            categories_searched,
            started_at,
        }
    }
}
