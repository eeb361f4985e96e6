//! Iterative dancing-links exact-cover search.
//!
//! The matrix lives in parallel index arrays forming the usual toroidal
//! doubly-linked structure. The search itself is a five-state automaton
//! rather than a recursive function, so deep search trees never touch
//! the call stack.

use crate::assembly::matrix::CoverMatrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchState {
    Forward,
    Advance,
    Backup,
    Recover,
    Done,
}

/// Enumerates exact covers of `matrix`, up to `max_solutions` of them.
/// Each solution is the ascending list of chosen row indices.
///
/// Primary columns must each be covered exactly once; secondary columns
/// sit outside the root's horizontal ring and are covered at most once.
pub fn search(matrix: &CoverMatrix, max_solutions: usize) -> Vec<Vec<usize>> {
    if max_solutions == 0 {
        return Vec::new();
    }
    let num_primary = matrix.num_primary();
    let num_columns = num_primary + matrix.num_secondary();
    if num_primary == 0 {
        // Nothing is required, so the empty selection is the one cover.
        return vec![Vec::new()];
    }

    let num_row_nodes: usize = matrix.rows().iter().map(|r| r.columns.len()).sum();
    // Node 0..num_columns are the column head nodes; row nodes follow.
    let total_nodes = num_columns + num_row_nodes;

    // Row-sibling and column-sibling links per node, plus the column
    // each node belongs to and the matrix row it came from.
    let mut nleft = vec![0usize; total_nodes];
    let mut nright = vec![0usize; total_nodes];
    let mut nup = vec![0usize; total_nodes];
    let mut ndown = vec![0usize; total_nodes];
    let mut ncol = vec![0usize; total_nodes];
    let mut nrow = vec![0usize; total_nodes];

    // Column bookkeeping, index 0 is the root.
    let mut chead = vec![0usize; num_columns + 1];
    let mut clen = vec![0usize; num_columns + 1];
    let mut cprev = vec![0usize; num_columns + 1];
    let mut cnext = vec![0usize; num_columns + 1];

    // Column heads. Primary columns form a ring through the root,
    // secondary columns link only to themselves.
    for col in 1..=num_columns {
        let head = col - 1;
        nup[head] = head;
        ndown[head] = head;
        ncol[head] = col;
        chead[col] = head;
        if col <= num_primary {
            cprev[col] = col - 1;
            cnext[col - 1] = col;
        } else {
            cprev[col] = col;
            cnext[col] = col;
        }
    }
    cnext[num_primary] = 0;
    cprev[0] = num_primary;

    // Row nodes, one ring per matrix row, appended to column tails so
    // each column keeps its rows in matrix order.
    let mut next_node = num_columns;
    for (row_index, row) in matrix.rows().iter().enumerate() {
        let row_start = next_node;
        for &column in &row.columns {
            let node = next_node;
            next_node += 1;
            let col = column + 1;
            ncol[node] = col;
            nrow[node] = row_index;
            nleft[node] = if node == row_start { node } else { node - 1 };
            if node != row_start {
                nright[node - 1] = node;
            }
            let head = chead[col];
            nup[node] = nup[head];
            ndown[nup[head]] = node;
            nup[head] = node;
            ndown[node] = head;
            clen[col] += 1;
        }
        nleft[row_start] = next_node - 1;
        nright[next_node - 1] = row_start;
    }

    let cover = |c: usize,
                 cnext: &mut [usize],
                 cprev: &mut [usize],
                 clen: &mut [usize],
                 nup: &mut [usize],
                 ndown: &mut [usize]| {
        cnext[cprev[c]] = cnext[c];
        cprev[cnext[c]] = cprev[c];
        let mut rr = ndown[chead[c]];
        while rr != chead[c] {
            let mut nn = nright[rr];
            while nn != rr {
                ndown[nup[nn]] = ndown[nn];
                nup[ndown[nn]] = nup[nn];
                clen[ncol[nn]] -= 1;
                nn = nright[nn];
            }
            rr = ndown[rr];
        }
    };

    let uncover = |c: usize,
                   cnext: &mut [usize],
                   cprev: &mut [usize],
                   clen: &mut [usize],
                   nup: &mut [usize],
                   ndown: &mut [usize]| {
        let mut rr = nup[chead[c]];
        while rr != chead[c] {
            let mut nn = nleft[rr];
            while nn != rr {
                ndown[nup[nn]] = nn;
                nup[ndown[nn]] = nn;
                clen[ncol[nn]] += 1;
                nn = nleft[nn];
            }
            rr = nup[rr];
        }
        cnext[cprev[c]] = c;
        cprev[cnext[c]] = c;
    };

    let mut solutions: Vec<Vec<usize>> = Vec::new();
    let mut state = SearchState::Forward;
    let mut level = 0usize;
    let mut choice: Vec<usize> = Vec::new();
    let mut best_col = 0usize;
    let mut current_node = 0usize;

    while state != SearchState::Done {
        match state {
            SearchState::Forward => {
                // Minimum remaining values; first seen wins ties.
                let mut lowest = cnext[0];
                let mut lowest_len = clen[lowest];
                let mut cur = cnext[lowest];
                while cur != 0 {
                    if clen[cur] < lowest_len {
                        lowest_len = clen[cur];
                        lowest = cur;
                    }
                    cur = cnext[cur];
                }
                best_col = lowest;
                cover(best_col, &mut cnext, &mut cprev, &mut clen, &mut nup, &mut ndown);
                current_node = ndown[chead[best_col]];
                if choice.len() == level {
                    choice.push(current_node);
                } else {
                    choice[level] = current_node;
                }
                state = SearchState::Advance;
            }
            SearchState::Advance => {
                if current_node == chead[best_col] {
                    state = SearchState::Backup;
                    continue;
                }
                let mut pp = nright[current_node];
                while pp != current_node {
                    cover(ncol[pp], &mut cnext, &mut cprev, &mut clen, &mut nup, &mut ndown);
                    pp = nright[pp];
                }
                if cnext[0] == 0 {
                    let mut rows: Vec<usize> =
                        choice[..=level].iter().map(|&node| nrow[node]).collect();
                    rows.sort_unstable();
                    solutions.push(rows);
                    state = if solutions.len() == max_solutions {
                        SearchState::Done
                    } else {
                        SearchState::Recover
                    };
                    continue;
                }
                level += 1;
                state = SearchState::Forward;
            }
            SearchState::Backup => {
                uncover(best_col, &mut cnext, &mut cprev, &mut clen, &mut nup, &mut ndown);
                if level == 0 {
                    state = SearchState::Done;
                    continue;
                }
                level -= 1;
                current_node = choice[level];
                best_col = ncol[current_node];
                state = SearchState::Recover;
            }
            SearchState::Recover => {
                // Strict mirror of the covers done in Advance.
                let mut pp = nleft[current_node];
                while pp != current_node {
                    uncover(ncol[pp], &mut cnext, &mut cprev, &mut clen, &mut nup, &mut ndown);
                    pp = nleft[pp];
                }
                current_node = ndown[current_node];
                choice[level] = current_node;
                state = SearchState::Advance;
            }
            SearchState::Done => {}
        }
    }

    solutions
}
